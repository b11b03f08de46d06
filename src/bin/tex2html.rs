//! CLI binary for edgequake-tex2html.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_tex2html::{
    convert, convert_stream, convert_to_file, inspect, write_atomic, ConversionConfig,
    ConversionOutput, ConversionProgressCallback, ConversionReport, ProgressCallback,
};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback for batch runs: one bar, one log line per
/// document. Documents may finish out of order.
struct CliProgressCallback {
    bar: ProgressBar,
    inputs: Vec<String>,
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(inputs: &[String]) -> Arc<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        let bar = ProgressBar::new(inputs.len() as u64);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            inputs: inputs.to_vec(),
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn label(&self, index: usize) -> &str {
        self.inputs.get(index).map(String::as_str).unwrap_or("?")
    }

    fn elapsed_secs(&self, index: usize) -> f64 {
        self.start_times
            .lock()
            .ok()
            .and_then(|mut m| m.remove(&index))
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total} document(s)…"))
        ));
    }

    fn on_document_start(&self, index: usize, _total: usize) {
        if let Ok(mut m) = self.start_times.lock() {
            m.insert(index, Instant::now());
        }
        self.bar.set_message(self.label(index).to_string());
    }

    fn on_document_complete(&self, index: usize, _total: usize, html_len: usize) {
        let secs = self.elapsed_secs(index);
        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            green("✓"),
            self.label(index),
            dim(&format!("{html_len:>6} bytes")),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, index: usize, _total: usize, error: &str) {
        let secs = self.elapsed_secs(index);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // First line only; fetch errors carry the URL on a second line.
        let msg = error.lines().next().unwrap_or(error);
        self.bar.println(format!(
            "  {} {:<40}  {}  {}",
            red("✗"),
            self.label(index),
            red(msg),
            dim(&format!("{secs:.2}s")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total: usize, success_count: usize) {
        let failed = total.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} document(s) converted successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} document(s) converted  ({} failed)",
                if failed == total { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (HTML fragment on stdout)
  tex2html resume.tex

  # Convert to a complete page with the résumé stylesheet
  tex2html resume.tex --standalone -o resume.html

  # Convert from URL
  tex2html "https://example.com/Original Tex.tex" -o resume.html

  # Batch: one .html per input
  tex2html cv-en.tex cv-fr.tex https://example.com/cv.tex --output-dir out/

  # Show what could not be converted
  tex2html --report resume.tex > /dev/null

  # Fail if anything had to be stripped
  tex2html --strict resume.tex -o resume.html

  # Header fields only
  tex2html --inspect-only --json resume.tex

  # JSON output with report and stats
  tex2html --json resume.tex > output.json

SUPPORTED CONSTRUCTS:
  \section, \subsection, header (name + contact line), \AND separators,
  twocolentry, threecolentry, onecolentry, highlights/itemize/enumerate,
  \textbf, \textit, \href, \hrefWithoutArrow, \url, \mbox, \kern, \vspace,
  \\ and escaped characters. Other commands are stripped (see --report).

ENVIRONMENT VARIABLES:
  Every flag can be set as TEX2HTML_<FLAG>, e.g. TEX2HTML_STANDALONE=true.
  RUST_LOG overrides the log filter.
"#;

/// Convert LaTeX résumés (files or URLs) to HTML.
#[derive(Parser, Debug)]
#[command(
    name = "tex2html",
    version,
    about = "Convert LaTeX résumés (files or URLs) to HTML",
    long_about = "Convert RenderCV-style LaTeX résumés to HTML fragments or standalone pages. \
Supported constructs map to semantic HTML with stable class names; anything else is stripped \
and can be listed with --report.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local .tex file paths or HTTP/HTTPS URLs.
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<String>,

    /// Write HTML to this file instead of stdout (single input).
    #[arg(short, long, env = "TEX2HTML_OUTPUT", conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Write one `<name>.html` per input into this directory.
    #[arg(long, env = "TEX2HTML_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Wrap the fragment in a complete HTML page with the résumé stylesheet.
    #[arg(long, env = "TEX2HTML_STANDALONE")]
    standalone: bool,

    /// `<title>` for --standalone (default: the name from the header).
    #[arg(long, env = "TEX2HTML_TITLE")]
    title: Option<String>,

    /// Output structured JSON (ConversionOutput) instead of HTML.
    #[arg(long, env = "TEX2HTML_JSON")]
    json: bool,

    /// Print the rules that fired and every stripped span to stderr.
    #[arg(long, env = "TEX2HTML_REPORT")]
    report: bool,

    /// Fail when any construct had to be stripped.
    #[arg(long, env = "TEX2HTML_STRICT")]
    strict: bool,

    /// Print the extracted name and location only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Number of documents fetched and converted at once.
    #[arg(short, long, env = "TEX2HTML_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// HTTP fetch timeout in seconds.
    #[arg(long, env = "TEX2HTML_FETCH_TIMEOUT", default_value_t = 30)]
    fetch_timeout: u64,

    /// Disable progress bar.
    #[arg(long, env = "TEX2HTML_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TEX2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TEX2HTML_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let batch = cli.inputs.len() > 1 || cli.output_dir.is_some();

    // ── Logging setup ────────────────────────────────────────────────────
    // The batch progress bar replaces INFO-level logs.
    let show_progress = batch && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        for input in &cli.inputs {
            let fields = inspect(input)
                .await
                .with_context(|| format!("Failed to inspect {input}"))?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&fields)
                        .context("Failed to serialize fields")?
                );
            } else {
                println!("File:      {}", input);
                println!("Name:      {}", or_dash(&fields.name));
                println!("Location:  {}", or_dash(&fields.location));
            }
        }
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new(&cli.inputs) as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    if batch {
        return run_batch(&cli, &config).await;
    }

    // ── Single document ──────────────────────────────────────────────────
    let input = &cli.inputs[0];

    if let Some(ref output_path) = cli.output {
        if cli.report {
            // The report needs the full output; write it ourselves.
            let output = convert(input, &config).await.context("Conversion failed")?;
            print_report(input, &output.report);
            write_atomic(output_path, &output.html)
                .await
                .context("Failed to write output")?;
            summary(&cli, &output, Some(output_path));
        } else {
            let stats = convert_to_file(input, output_path, &config)
                .await
                .context("Conversion failed")?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} → {} bytes  {}ms  →  {}",
                    stripped_mark(stats.stripped_spans),
                    stats.input_bytes,
                    stats.output_bytes,
                    stats.total_duration_ms,
                    bold(&output_path.display().to_string()),
                );
            }
        }
        return Ok(());
    }

    let output = convert(input, &config).await.context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.html.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.html.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if cli.report {
        print_report(input, &output.report);
    }
    if !cli.json {
        summary(&cli, &output, None);
    }

    Ok(())
}

/// Convert every input, writing `<stem>.html` files into `--output-dir`.
async fn run_batch(cli: &Cli, config: &ConversionConfig) -> Result<()> {
    let Some(ref dir) = cli.output_dir else {
        anyhow::bail!("Multiple inputs need --output-dir (or convert them one at a time)");
    };
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut stream = convert_stream(cli.inputs.clone(), config);
    let mut failed = 0usize;
    let mut json_results = Vec::new();

    while let Some(doc) = stream.next().await {
        match doc.result {
            Ok(output) => {
                let path = dir.join(output_file_name(doc.index, &doc.input));
                write_atomic(&path, &output.html)
                    .await
                    .context("Failed to write output")?;
                if cli.report {
                    print_report(&doc.input, &output.report);
                }
                if cli.json {
                    json_results.push(serde_json::json!({
                        "input": doc.input,
                        "output": path,
                        "fields": output.fields,
                        "stats": output.stats,
                    }));
                }
            }
            Err(e) => {
                failed += 1;
                if config.progress_callback.is_none() {
                    eprintln!("{} {}: {}", red("Error:"), doc.input, e);
                }
                if cli.json {
                    json_results.push(serde_json::json!({
                        "input": doc.input,
                        "error": e.to_string(),
                    }));
                }
            }
        }
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_results).context("Failed to serialise output")?
        );
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} document(s) failed", cli.inputs.len());
    }
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .report(cli.report || cli.json)
        .standalone(cli.standalone)
        .strict(cli.strict)
        .concurrency(cli.concurrency)
        .fetch_timeout_secs(cli.fetch_timeout);

    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// `<stem>.html` from the last path or URL segment; the index keeps
/// duplicate stems apart.
fn output_file_name(index: usize, input: &str) -> String {
    let last = input
        .trim_end_matches('/')
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(input);
    let last = last.split(&['?', '#'][..]).next().unwrap_or(last);
    let stem = last.strip_suffix(".tex").unwrap_or(last).replace("%20", " ");
    let stem: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        format!("document-{}.html", index + 1)
    } else {
        format!("{:02}-{stem}.html", index + 1)
    }
}

fn print_report(input: &str, report: &ConversionReport) {
    eprintln!("{} {}", cyan("◆"), bold(&format!("Report for {input}")));
    for stat in &report.applied {
        eprintln!(
            "  {:<32} {:<14} {}",
            stat.rule,
            dim(&format!("{:?}", stat.stage)),
            stat.matches
        );
    }
    if report.is_clean() {
        eprintln!("  {} nothing stripped", green("✓"));
    } else {
        eprintln!("  {} {} span(s) stripped:", yellow("⚠"), report.stripped.len());
        for span in &report.stripped {
            eprintln!("    {}  {}", dim(&span.rule), span.text.trim());
        }
    }
}

fn summary(cli: &Cli, output: &ConversionOutput, path: Option<&PathBuf>) {
    if cli.quiet {
        return;
    }
    let target = path
        .map(|p| format!("  →  {}", bold(&p.display().to_string())))
        .unwrap_or_default();
    eprintln!(
        "{}  {} → {} bytes  {} rules  {}ms{}",
        stripped_mark(output.stats.stripped_spans),
        output.stats.input_bytes,
        output.stats.output_bytes,
        output.stats.rules_fired,
        output.stats.total_duration_ms,
        target,
    );
}

fn stripped_mark(stripped: usize) -> String {
    if stripped == 0 {
        green("✔")
    } else {
        yellow(&format!("⚠ {stripped} stripped"))
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "—"
    } else {
        s
    }
}
