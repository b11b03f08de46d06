//! Eager (single-document) conversion entry points.
//!
//! [`convert_str`] is the core: LaTeX text in, HTML out, no I/O and no
//! failure mode. Everything else here wraps it with input resolution,
//! strict-mode checking or file output. Use [`crate::stream::convert_stream`]
//! for many documents at once.

use crate::config::ConversionConfig;
use crate::error::Tex2HtmlError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::extract::{self, ExtractedFields};
use crate::pipeline::input;
use crate::pipeline::rewrite::Rewriter;
use crate::styles;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

const DEFAULT_TITLE: &str = "Résumé";

/// Convert LaTeX source text to HTML.
///
/// Never fails: constructs outside the supported vocabulary are stripped and
/// listed in `output.report.stripped`. `config.strict` is not consulted here;
/// call [`ConversionOutput::into_result`] to apply it.
pub fn convert_str(latex: &str, config: &ConversionConfig) -> ConversionOutput {
    let start = Instant::now();

    // ── Step 1: Extract header fields from the untouched source ─────────
    let fields = extract::extract_fields(latex);
    debug!(name = %fields.name, location = %fields.location, "Extracted header fields");

    // ── Step 2: Run the rule table ──────────────────────────────────────
    let rewrite = Rewriter::new(&fields)
        .record_spans(config.report || config.strict)
        .run(latex);

    if rewrite.stripped_count > 0 {
        warn!(
            "Stripped {} unsupported construct(s) during conversion",
            rewrite.stripped_count
        );
    }

    // ── Step 3: Optional page wrapper ───────────────────────────────────
    let html = if config.standalone {
        let title = document_title(config, &fields);
        styles::standalone_document(&rewrite.html, title)
    } else {
        rewrite.html
    };

    let elapsed = start.elapsed().as_millis() as u64;
    let stats = ConversionStats {
        input_bytes: latex.len(),
        output_bytes: html.len(),
        rules_fired: rewrite.report.applied.len(),
        stripped_spans: rewrite.stripped_count,
        fetch_duration_ms: 0,
        rewrite_duration_ms: elapsed,
        total_duration_ms: elapsed,
    };

    ConversionOutput {
        html,
        fields,
        report: rewrite.report,
        stats,
    }
}

/// Convert a LaTeX file or URL to HTML.
///
/// # Errors
/// Returns `Err(Tex2HtmlError)` when the source cannot be obtained (missing
/// file, non-success HTTP status, timeout, not UTF-8), or, with
/// `config.strict`, when anything had to be stripped.
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Tex2HtmlError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    let fetch_start = Instant::now();
    let latex = input::resolve_input(input_str, config.fetch_timeout_secs).await?;
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;

    let mut output = convert_str(&latex, config);
    output.stats.fetch_duration_ms = fetch_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Conversion complete: {} → {} bytes, {} rules fired, {}ms total",
        output.stats.input_bytes,
        output.stats.output_bytes,
        output.stats.rules_fired,
        output.stats.total_duration_ms
    );

    if config.strict {
        output.into_result()
    } else {
        Ok(output)
    }
}

/// Convert and write the HTML directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Tex2HtmlError> {
    let output = convert(input_str, config).await?;
    write_atomic(output_path.as_ref(), &output.html).await?;
    Ok(output.stats)
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Tex2HtmlError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Tex2HtmlError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_str, config))
}

/// Read the header fields without rewriting anything.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<ExtractedFields, Tex2HtmlError> {
    let defaults = ConversionConfig::default();
    let latex = input::resolve_input(input_str.as_ref(), defaults.fetch_timeout_secs).await?;
    Ok(extract::extract_fields(&latex))
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn document_title<'a>(config: &'a ConversionConfig, fields: &'a ExtractedFields) -> &'a str {
    match config.title.as_deref() {
        Some(t) if !t.trim().is_empty() => t,
        _ if !fields.name.is_empty() => &fields.name,
        _ => DEFAULT_TITLE,
    }
}

/// Write `contents` to `path` through a sibling `.tmp` file and a rename,
/// creating parent directories. A reader never sees a partial file.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<(), Tex2HtmlError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Tex2HtmlError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("html.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .map_err(|e| Tex2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Tex2HtmlError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "\\begin{header}\n\\fontsize{25 pt}{25 pt}\\selectfont Jane Doe\n\\normalsize\n\\mbox{Springfield, Location}%\n\\end{header}\n";

    #[test]
    fn test_convert_str_fragment() {
        let out = convert_str("\\section{Skills}\n\\textbf{Rust}", &ConversionConfig::default());
        assert_eq!(
            out.html,
            "<h2 class=\"section-title\">Skills</h2>\n<strong>Rust</strong>"
        );
        assert_eq!(out.stats.output_bytes, out.html.len());
        assert_eq!(out.stats.fetch_duration_ms, 0);
        assert!(out.report.is_clean());
    }

    #[test]
    fn test_standalone_uses_extracted_name() {
        let config = ConversionConfig::builder().standalone(true).build().unwrap();
        let out = convert_str(HEADER, &config);
        assert!(out.html.starts_with("<!DOCTYPE html>"));
        assert!(out.html.contains("<title>Jane Doe</title>"));
        assert_eq!(out.fields.name, "Jane Doe");
    }

    #[test]
    fn test_standalone_title_override_and_default() {
        let config = ConversionConfig::builder()
            .standalone(true)
            .title("My CV")
            .build()
            .unwrap();
        assert!(convert_str(HEADER, &config).html.contains("<title>My CV</title>"));

        let config = ConversionConfig::builder().standalone(true).build().unwrap();
        assert!(convert_str("plain", &config)
            .html
            .contains("<title>Résumé</title>"));
    }

    #[test]
    fn test_report_disabled_keeps_count() {
        let config = ConversionConfig::builder().report(false).build().unwrap();
        let out = convert_str("\\foo{x} text", &config);
        assert!(out.report.stripped.is_empty());
        assert_eq!(out.stats.stripped_spans, 1);
    }

    #[test]
    fn test_strict_records_spans_even_without_report() {
        let config = ConversionConfig::builder()
            .report(false)
            .strict(true)
            .build()
            .unwrap();
        let err = convert_str("\\foo{x} text", &config).into_result().unwrap_err();
        assert!(matches!(err, Tex2HtmlError::StrippedContent { count: 1, .. }));
    }

    #[tokio::test]
    async fn test_convert_missing_file() {
        let err = convert("/no/such/resume.tex", &ConversionConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Tex2HtmlError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cv.html");
        write_atomic(&path, "<p>x</p>").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>x</p>");
        assert!(!path.with_extension("html.tmp").exists());
    }
}
