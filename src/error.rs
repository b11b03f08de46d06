//! Error types for the edgequake-tex2html library.
//!
//! Only the stages around the rewrite can fail:
//!
//! * [`Tex2HtmlError`]: **fatal**, the LaTeX source could not be obtained
//!   (missing file, failed download, not UTF-8) or the output could not be
//!   written. Returned as `Err(Tex2HtmlError)` from the async `convert*`
//!   functions; no HTML is produced.
//!
//! * The rewrite itself never fails. Unknown constructs are stripped and
//!   recorded in [`crate::output::ConversionReport`] instead, so callers who
//!   care about fidelity can inspect what was dropped (or opt into
//!   [`Tex2HtmlError::StrippedContent`] via strict mode).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-tex2html library.
#[derive(Debug, Error)]
pub enum Tex2HtmlError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("LaTeX file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is neither a readable path nor an HTTP/HTTPS URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// The server answered, but not with a success status.
    #[error("Failed to fetch the LaTeX file: {status} {reason}\nURL: {url}")]
    FetchFailed {
        url: String,
        status: u16,
        reason: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset…).
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --fetch-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The source was read but is not valid UTF-8 text.
    #[error("'{source_name}' is not valid UTF-8 (invalid byte at offset {offset})")]
    NotUtf8 { source_name: String, offset: usize },

    /// Could not read a local file for a reason other than absence/permission.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Strict mode: the conversion had to strip constructs it does not know.
    ///
    /// Returned by [`crate::output::ConversionOutput::into_result`] when the
    /// caller wants any stripped content to count as a failure.
    #[error("{count} unrecognised construct(s) were stripped; first: '{first}' (rule {rule})")]
    StrippedContent {
        count: usize,
        rule: String,
        first: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_names_status() {
        let e = Tex2HtmlError::FetchFailed {
            url: "https://cv.test/Original Tex.tex".into(),
            status: 404,
            reason: "Not Found".into(),
        };
        let msg = e.to_string();
        assert!(
            msg.starts_with("Failed to fetch the LaTeX file: 404 Not Found"),
            "got: {msg}"
        );
    }

    #[test]
    fn timeout_display() {
        let e = Tex2HtmlError::DownloadTimeout {
            url: "https://cv.test/a.tex".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
    }

    #[test]
    fn stripped_content_display() {
        let e = Tex2HtmlError::StrippedContent {
            count: 3,
            rule: "strip_bare_commands".into(),
            first: "\\raggedright".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("3 unrecognised"));
        assert!(msg.contains("strip_bare_commands"));
    }

    #[test]
    fn not_utf8_display() {
        let e = Tex2HtmlError::NotUtf8 {
            source_name: "cv.tex".into(),
            offset: 17,
        };
        assert!(e.to_string().contains("offset 17"));
    }
}
