//! Batch conversion API: emit documents as they complete.
//!
//! Fetching dominates the cost of a conversion (the rewrite of a résumé takes
//! microseconds), so a batch of URLs is resolved concurrently, bounded by
//! `config.concurrency`. Results arrive in completion order; sort by
//! [`DocumentResult::index`] if order matters.

use crate::config::ConversionConfig;
use crate::convert;
use crate::error::Tex2HtmlError;
use crate::output::ConversionOutput;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::{info, warn};

/// The outcome of one input in a batch.
#[derive(Debug)]
pub struct DocumentResult {
    /// Position of the input in the original list (0-based).
    pub index: usize,
    /// The path or URL as given.
    pub input: String,
    pub result: Result<ConversionOutput, Tex2HtmlError>,
}

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = DocumentResult> + Send>>;

/// Convert many LaTeX files or URLs, streaming each result as it is ready.
///
/// One failing input never stops the batch; its error is carried in
/// [`DocumentResult::result`]. Progress events fire on
/// `config.progress_callback` if set, with `on_conversion_complete` after the
/// last document.
///
/// # Example
/// ```rust,no_run
/// use edgequake_tex2html::{convert_stream, ConversionConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let inputs = vec!["a.tex".to_string(), "https://example.com/b.tex".to_string()];
/// let mut stream = convert_stream(inputs, &ConversionConfig::default());
/// while let Some(doc) = stream.next().await {
///     match doc.result {
///         Ok(out) => println!("{}: {} bytes", doc.input, out.html.len()),
///         Err(e) => eprintln!("{}: {e}", doc.input),
///     }
/// }
/// # }
/// ```
pub fn convert_stream(inputs: Vec<String>, config: &ConversionConfig) -> DocumentStream {
    let total = inputs.len();
    info!("Starting batch conversion of {} document(s)", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(total);
    }

    let succeeded = Arc::new(AtomicUsize::new(0));
    let config_clone = config.clone();
    let counter = Arc::clone(&succeeded);

    let documents = stream::iter(inputs.into_iter().enumerate().map(move |(index, input)| {
        let cfg = config_clone.clone();
        let counter = Arc::clone(&counter);
        async move {
            if let Some(ref cb) = cfg.progress_callback {
                cb.on_document_start(index, total);
            }
            let result = convert::convert(&input, &cfg).await;
            match &result {
                Ok(out) => {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if let Some(ref cb) = cfg.progress_callback {
                        cb.on_document_complete(index, total, out.html.len());
                    }
                }
                Err(e) => {
                    warn!("Document {} ({}) failed: {}", index + 1, input, e);
                    if let Some(ref cb) = cfg.progress_callback {
                        cb.on_document_error(index, total, &e.to_string());
                    }
                }
            }
            DocumentResult {
                index,
                input,
                result,
            }
        }
    }))
    .buffer_unordered(config.concurrency);

    // Fires once the last document has been yielded; contributes no items.
    let callback = config.progress_callback.clone();
    let finish = stream::once(async move {
        let ok = succeeded.load(Ordering::SeqCst);
        info!("Batch complete: {}/{} document(s) converted", ok, total);
        if let Some(cb) = callback {
            cb.on_conversion_complete(total, ok);
        }
        None
    })
    .filter_map(|doc: Option<DocumentResult>| async move { doc });

    Box::pin(documents.chain(finish))
}
