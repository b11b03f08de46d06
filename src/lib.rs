//! # edgequake-tex2html
//!
//! Convert LaTeX résumés (RenderCV-style templates) to HTML fragments an
//! editor or browser can display.
//!
//! ## Why this crate?
//!
//! Résumé templates use a small, predictable slice of LaTeX: a header with
//! name and contact line, sections, two- and three-column entries, bullet
//! highlights, bold/italic and links. Running a full TeX engine to get HTML
//! out of that is overkill. Instead this crate applies an ordered table of
//! pattern rewrites that maps each construct to semantic HTML, and strips
//! (and reports) anything it does not know.
//!
//! ## Pipeline Overview
//!
//! ```text
//! LaTeX
//!  │
//!  ├─ 1. Input    read local file or GET a URL
//!  ├─ 2. Extract  name + location from the raw header
//!  ├─ 3. Rewrite  ordered rule table: preamble → header → layout →
//!  │              sections → entries → lists → inline → links → spacing
//!  ├─ 4. Fallback strip unknown commands, stray backslashes, braces
//!  └─ 5. Output   HTML fragment (or standalone page) + report + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_tex2html::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("resume.tex", &config).await?;
//!     println!("{}", output.html);
//!     eprintln!("{} construct(s) stripped", output.stats.stripped_spans);
//!     Ok(())
//! }
//! ```
//!
//! For text already in memory, [`convert_str`] needs no runtime:
//!
//! ```rust
//! use edgequake_tex2html::{convert_str, ConversionConfig};
//!
//! let out = convert_str("\\section{Skills}", &ConversionConfig::default());
//! assert_eq!(out.html, "<h2 class=\"section-title\">Skills</h2>");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `tex2html` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-tex2html = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;
pub mod styles;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_str, convert_sync, convert_to_file, inspect, write_atomic};
pub use error::Tex2HtmlError;
pub use output::{ConversionOutput, ConversionReport, ConversionStats, RuleStat, StrippedSpan};
pub use pipeline::extract::{extract_fields, ExtractedFields};
pub use pipeline::rewrite::rewrite;
pub use pipeline::rules::{Rule, Stage};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, DocumentResult, DocumentStream};
pub use styles::{standalone_document, RESUME_STYLESHEET};
