//! Configuration types for LaTeX-to-HTML conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The rewrite itself has no knobs (its
//! rule table is fixed); the config covers what happens around it: fetching,
//! reporting, output shape and batch concurrency.

use crate::error::Tex2HtmlError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for a LaTeX-to-HTML conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_tex2html::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .standalone(true)
///     .fetch_timeout_secs(10)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Record every span removed by the fallback rules. Default: true.
    ///
    /// Counts are always kept in [`crate::output::ConversionStats`]; this
    /// only controls whether the text of each span is copied into the report.
    pub report: bool,

    /// Wrap the fragment in a full HTML page with the résumé stylesheet.
    /// Default: false (bare fragment, as an editor surface expects).
    pub standalone: bool,

    /// `<title>` for standalone output. If None, the extracted name is used,
    /// falling back to "Résumé".
    pub title: Option<String>,

    /// Treat stripped content as a conversion error. Default: false.
    pub strict: bool,

    /// Number of documents converted at once by [`crate::stream::convert_stream`].
    /// Default: 4.
    pub concurrency: usize,

    /// Timeout for URL inputs in seconds. Default: 30.
    pub fetch_timeout_secs: u64,

    /// Optional per-document progress events for batch conversion.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            report: true,
            standalone: false,
            title: None,
            strict: false,
            concurrency: 4,
            fetch_timeout_secs: 30,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("report", &self.report)
            .field("standalone", &self.standalone)
            .field("title", &self.title)
            .field("strict", &self.strict)
            .field("concurrency", &self.concurrency)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn report(mut self, v: bool) -> Self {
        self.config.report = v;
        self
    }

    pub fn standalone(mut self, v: bool) -> Self {
        self.config.standalone = v;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn strict(mut self, v: bool) -> Self {
        self.config.strict = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Tex2HtmlError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Tex2HtmlError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.fetch_timeout_secs == 0 {
            return Err(Tex2HtmlError::InvalidConfig(
                "Fetch timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
