//! CLI binary for book-covers.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig`, runs the selected books and prints results.

use anyhow::{Context, Result};
use book_covers::{
    extract_covers, BookCatalog, BookError, BookSpec, CoverError, CoverOutput, CoverStatus,
    ExtractionConfig, ExtractionProgressCallback, ProgressCallback,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Prints an `[ok]` line on stdout as each cover lands. When a spinner is
/// attached, lines are printed through it so the bar is not torn.
struct CliProgressCallback {
    bar: Option<ProgressBar>,
}

impl CliProgressCallback {
    fn new(show_spinner: bool) -> Arc<Self> {
        let bar = show_spinner.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
            bar.set_style(style);
            bar.set_prefix("Covers");
            bar.set_message("Checking Ghostscript…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar })
    }

    fn print_ok(&self, line: String) {
        match self.bar {
            Some(ref bar) => bar.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn clear(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_book_start(&self, index: usize, total: usize, book: &BookSpec) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("{}  {}", book.title, dim(&format!("{index}/{total}"))));
        }
    }

    fn on_book_complete(&self, _index: usize, _total: usize, output: &CoverOutput) {
        // stdout carries the bare line; size and status go to the spinner.
        if let Some(ref bar) = self.bar {
            let detail = match (output.status, output.width, output.height) {
                (CoverStatus::AlreadyPresent, ..) => "already present".to_string(),
                (CoverStatus::Generated, Some(w), Some(h)) => format!("{w}x{h}"),
                _ => String::new(),
            };
            bar.set_message(format!("{} {}  {}", green("✓"), output.title, dim(&detail)));
        }
        self.print_ok(output.ok_line());
    }

    fn on_book_error(&self, _index: usize, _total: usize, book: &BookSpec, _error: &BookError) {
        // The full message is printed with the others once the run ends.
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("{} {}", red("✗"), book.title));
        }
    }

    fn on_run_complete(&self, total: usize, success: usize) {
        self.clear();
        if self.bar.is_some() && success == total {
            eprintln!("{} {} cover(s) ready", green("✔"), bold(&success.to_string()));
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate every missing cover
  extract-book-covers

  # Regenerate one cover at a smaller width
  extract-book-covers --book learning-tactus --width 600 --overwrite

  # Offline: only use PDFs already in the cache
  extract-book-covers --no-download

  # Machine-readable report
  extract-book-covers --json > report.json

EXIT CODES:
  0  every selected book produced a cover (or already had one)
  1  at least one book failed, or the configuration was invalid
  2  Ghostscript is not installed; nothing was attempted

ENVIRONMENT VARIABLES:
  GHOSTSCRIPT_PATH        Path to a Ghostscript executable (skips the PATH search)
  RUST_LOG                Override the log filter (e.g. book_covers=debug)
"#;

/// Generate website cover images from the first page of each book's PDF.
#[derive(Parser, Debug)]
#[command(
    name = "extract-book-covers",
    version,
    about = "Generate book cover PNGs from the first page of each book's PDF",
    long_about = "Download each book's PDF (cached), render page 1 with Ghostscript, trim the \
uniform border, resize to a maximum width and write an optimised PNG. Existing covers are kept \
unless --overwrite is given.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory for the final cover PNGs.
    #[arg(long, env = "BOOK_COVERS_OUT_DIR", default_value = book_covers::config::DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// Directory for downloaded PDFs and intermediate renders.
    #[arg(long, env = "BOOK_COVERS_CACHE_DIR", default_value = book_covers::config::DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Render resolution for page 1 (1–2400).
    #[arg(long, env = "BOOK_COVERS_DPI", default_value_t = book_covers::config::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..=2400))]
    dpi: u32,

    /// Maximum output width in pixels. Narrower covers are not upscaled.
    #[arg(long, env = "BOOK_COVERS_WIDTH", default_value_t = book_covers::pipeline::resize::DEFAULT_MAX_WIDTH,
          value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Pixels of border kept around the detected content.
    #[arg(long, env = "BOOK_COVERS_PADDING", default_value_t = book_covers::pipeline::autocrop::DEFAULT_PADDING)]
    padding: u32,

    /// Regenerate covers even if the output file exists.
    #[arg(long, env = "BOOK_COVERS_OVERWRITE")]
    overwrite: bool,

    /// Fail a book instead of downloading its PDF when it is not cached.
    #[arg(long, env = "BOOK_COVERS_NO_DOWNLOAD")]
    no_download: bool,

    /// Only process this book (repeatable): learning-tactus, programming-tactus,
    /// tactus-in-a-nutshell. Default: all books.
    #[arg(long = "book", value_name = "SLUG", value_parser = parse_book_slug)]
    books: Vec<String>,

    /// HTTP download timeout in seconds. Default: no timeout.
    #[arg(long, env = "BOOK_COVERS_DOWNLOAD_TIMEOUT",
          value_parser = clap::value_parser!(u64).range(1..))]
    download_timeout: Option<u64>,

    /// Print the run report as JSON on stdout instead of `[ok]` lines.
    #[arg(long, env = "BOOK_COVERS_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would interleave with the spinner, so it gets
    // error-only unless --verbose.
    let show_spinner = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Select books ─────────────────────────────────────────────────────
    let catalog = BookCatalog::builtin();
    let books = catalog.select(cli.books.as_slice()).context("Invalid book selection")?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb = CliProgressCallback::new(show_spinner);
    let print_ok_lines = !cli.quiet && !cli.json;
    let config = build_config(
        &cli,
        print_ok_lines.then(|| Arc::clone(&progress_cb) as ProgressCallback),
    )?;

    // ── Run ──────────────────────────────────────────────────────────────
    let report = match extract_covers(&books, &config) {
        Ok(report) => report,
        Err(e @ CoverError::DependencyMissing { .. }) => {
            progress_cb.clear();
            eprintln!("[error] {e}");
            return Ok(ExitCode::from(e.exit_code()));
        }
        Err(e) => {
            progress_cb.clear();
            return Err(e).context("Cover extraction failed");
        }
    };
    progress_cb.clear();

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    }

    for line in report.failures() {
        eprintln!("[error] {line}");
    }

    if !cli.quiet && !cli.json && !report.is_success() {
        eprintln!(
            "{} {}/{} cover(s) ready  ({} failed)",
            red("✘"),
            report.stats.total - report.stats.failed,
            report.stats.total,
            red(&report.stats.failed.to_string()),
        );
    }

    Ok(ExitCode::from(report.exit_code()))
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .out_dir(cli.out_dir.clone())
        .cache_dir(cli.cache_dir.clone())
        .dpi(cli.dpi)
        .max_width(cli.width)
        .padding(cli.padding)
        .overwrite(cli.overwrite)
        .allow_download(!cli.no_download)
        .download_timeout_secs(cli.download_timeout);

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Reject `--book` values that are not in the built-in catalog at parse time.
fn parse_book_slug(s: &str) -> std::result::Result<String, String> {
    let catalog = BookCatalog::builtin();
    if catalog.get(s).is_some() {
        Ok(s.to_string())
    } else {
        let known: Vec<&str> = catalog.slugs().collect();
        Err(format!("expected one of: {}", known.join(", ")))
    }
}
