//! Input resolution: turn a user-supplied path or URL into LaTeX text.
//!
//! The rewrite works on an in-memory `&str`, so this stage only has to
//! produce one: read a local file, or GET a URL. A failed fetch (transport
//! error or non-success status) is returned as an error naming the failure
//! and conversion is never attempted.

use crate::error::Tex2HtmlError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to the LaTeX source text.
///
/// URLs are downloaded with the given timeout; anything else is treated as
/// a local path.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<String, Tex2HtmlError> {
    if input.trim().is_empty() {
        return Err(Tex2HtmlError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        fetch_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Read a local file, mapping the common I/O failures to typed errors.
async fn read_local(path_str: &str) -> Result<String, Tex2HtmlError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Tex2HtmlError::FileNotFound { path });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Tex2HtmlError::PermissionDenied { path });
        }
        Err(e) => return Err(Tex2HtmlError::ReadFailed { path, source: e }),
    };

    debug!("Read local LaTeX source: {} ({} bytes)", path.display(), bytes.len());
    decode(bytes, path_str)
}

/// GET a URL and return its body as text.
async fn fetch_url(url: &str, timeout_secs: u64) -> Result<String, Tex2HtmlError> {
    info!("Fetching LaTeX source from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Tex2HtmlError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(url, timeout_secs, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Tex2HtmlError::FetchFailed {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| transport_error(url, timeout_secs, e))?;

    info!("Fetched {} bytes", bytes.len());
    decode(bytes.to_vec(), url)
}

fn transport_error(url: &str, timeout_secs: u64, e: reqwest::Error) -> Tex2HtmlError {
    if e.is_timeout() {
        Tex2HtmlError::DownloadTimeout {
            url: url.to_string(),
            secs: timeout_secs,
        }
    } else {
        Tex2HtmlError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Decode UTF-8, dropping a leading byte-order mark.
fn decode(bytes: Vec<u8>, source_name: &str) -> Result<String, Tex2HtmlError> {
    let text = String::from_utf8(bytes).map_err(|e| Tex2HtmlError::NotUtf8 {
        source_name: source_name.to_string(),
        offset: e.utf8_error().valid_up_to(),
    })?;
    Ok(match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/Original Tex.tex"));
        assert!(is_url("http://example.com/cv.tex"));
        assert!(!is_url("/tmp/cv.tex"));
        assert!(!is_url("cv.tex"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_decode_strips_bom() {
        let mut bytes = "\u{FEFF}".as_bytes().to_vec();
        bytes.extend_from_slice(b"\\section{A}");
        assert_eq!(decode(bytes, "x").unwrap(), "\\section{A}");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = decode(vec![b'a', b'b', 0xff, b'c'], "cv.tex").unwrap_err();
        match err {
            Tex2HtmlError::NotUtf8 { offset, .. } => assert_eq!(offset, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = resolve_input("/definitely/not/here.tex", 5).await.unwrap_err();
        assert!(matches!(err, Tex2HtmlError::FileNotFound { .. }), "got: {err}");
    }

    #[tokio::test]
    async fn test_empty_input_is_invalid() {
        let err = resolve_input("  ", 5).await.unwrap_err();
        assert!(matches!(err, Tex2HtmlError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_reads_local_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"\\section{Education}").unwrap();
        let text = resolve_input(f.path().to_str().unwrap(), 5).await.unwrap();
        assert_eq!(text, "\\section{Education}");
    }
}
