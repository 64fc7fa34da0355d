//! Cover-extraction entry points.
//!
//! [`extract_cover`] runs the whole pipeline for one book and applies the
//! cache/overwrite policy. [`extract_covers`] runs it for a selection of
//! books, one after another, and collects every outcome into a
//! [`RunReport`]: a failing book never stops the books after it.
//!
//! ## What is cached
//!
//! | Artifact | Reused when present? |
//! |---|---|
//! | `{cache_dir}/{slug}.pdf` | yes, downloaded only when missing |
//! | `{cache_dir}/{slug}.page1.png` | no, re-rendered on every generation |
//! | `{out_dir}/{output_filename}` | yes, unless `overwrite` is set |
//!
//! The intermediate render is always refreshed so changes to DPI, trimming
//! or resizing take effect without clearing the cache by hand; only the
//! network download is expensive enough to keep.

use crate::books::BookSpec;
use crate::config::ExtractionConfig;
use crate::error::{BookError, CoverError};
use crate::output::{BookResult, CoverOutput, CoverStatus, RunReport};
use crate::pipeline::fetch::{Fetcher, HttpFetcher};
use crate::pipeline::rasterize::{GhostscriptRasterizer, Rasterizer};
use crate::pipeline::{autocrop, encode, resize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Extract the cover for a single book.
///
/// Uses the fetcher and rasterizer from `config`, falling back to
/// [`HttpFetcher`] and [`GhostscriptRasterizer`]. Does not perform the
/// up-front rasterizer availability check; a missing Ghostscript surfaces as
/// [`BookError::RasterisationFailed`].
///
/// # Errors
/// Returns the first [`BookError`] hit by any stage. No output file is
/// written in that case.
pub fn extract_cover(book: &BookSpec, config: &ExtractionConfig) -> Result<CoverOutput, BookError> {
    let fetcher = resolve_fetcher(config).map_err(|e| BookError::FetchFailed {
        url: book.source_url.clone(),
        reason: e.to_string(),
    })?;
    let rasterizer = resolve_rasterizer(config);
    run_book(book, config, fetcher.as_ref(), rasterizer.as_ref())
}

/// Extract covers for `books`, sequentially, in the given order.
///
/// # Returns
/// `Ok(RunReport)` once every book has been attempted, even if some failed
/// (check [`RunReport::exit_code`] or [`RunReport::failures`]).
///
/// # Errors
/// Returns `Err(CoverError)` only for run-level problems, before any book is
/// touched:
/// - [`CoverError::DependencyMissing`] when the rasterizer is unavailable
///   (no book is fetched or rendered)
/// - [`CoverError::Internal`] when the HTTP client cannot be constructed
pub fn extract_covers(
    books: &[&BookSpec],
    config: &ExtractionConfig,
) -> Result<RunReport, CoverError> {
    let run_start = Instant::now();

    // ── Step 1: Rasterizer must exist before anything else happens ───────
    let rasterizer = resolve_rasterizer(config);
    rasterizer.check_available()?;

    // ── Step 2: Downloader ───────────────────────────────────────────────
    let fetcher = resolve_fetcher(config)
        .map_err(|e| CoverError::Internal(format!("Failed to build HTTP client: {e}")))?;

    let total = books.len();
    info!("Extracting {} cover(s)", total);
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 3: One book at a time, collecting outcomes ──────────────────
    let mut results = Vec::with_capacity(total);
    for (i, book) in books.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_book_start(index, total, book);
        }

        let outcome = run_book(book, config, fetcher.as_ref(), rasterizer.as_ref());

        let result = match outcome {
            Ok(output) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_book_complete(index, total, &output);
                }
                BookResult {
                    slug: book.slug.clone(),
                    title: book.title.clone(),
                    output: Some(output),
                    error: None,
                }
            }
            Err(e) => {
                warn!("{}: {}", book.title, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_book_error(index, total, book, &e);
                }
                BookResult {
                    slug: book.slug.clone(),
                    title: book.title.clone(),
                    output: None,
                    error: Some(e),
                }
            }
        };
        results.push(result);
    }

    // ── Step 4: Report ───────────────────────────────────────────────────
    let report = RunReport::new(results, run_start.elapsed().as_millis() as u64);
    info!(
        "Run complete: {} generated, {} already present, {} failed, {}ms",
        report.stats.generated,
        report.stats.already_present,
        report.stats.failed,
        report.stats.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total, total - report.stats.failed);
    }

    Ok(report)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The per-book pipeline, in policy order.
fn run_book(
    book: &BookSpec,
    config: &ExtractionConfig,
    fetcher: &dyn Fetcher,
    rasterizer: &dyn Rasterizer,
) -> Result<CoverOutput, BookError> {
    let start = Instant::now();

    // ── Step 1: Existing output short-circuits everything ────────────────
    let output_path = book.output_path(&config.out_dir);
    if is_reusable(&output_path, config) {
        info!("{}: keeping existing {}", book.title, output_path.display());
        return Ok(already_present(book, output_path, start.elapsed()));
    }

    // ── Step 2: Source PDF, from cache or network ────────────────────────
    let pdf_path = book.pdf_cache_path(&config.cache_dir);
    if pdf_path.exists() {
        debug!("{}: using cached {}", book.title, pdf_path.display());
    } else {
        if !config.allow_download {
            return Err(BookError::DownloadDisabled { path: pdf_path });
        }
        fetcher.fetch(&book.source_url, &pdf_path)?;
    }

    // ── Step 3: Always re-render page 1 ──────────────────────────────────
    let render_path = book.render_cache_path(&config.cache_dir);
    rasterizer.render_first_page(&pdf_path, &render_path, config.dpi)?;

    // ── Step 4: Decode → trim → resize → save ────────────────────────────
    let image = encode::load_image(&render_path).map_err(|e| BookError::ImageFailed {
        path: render_path.clone(),
        detail: e.to_string(),
    })?;
    let image = autocrop::trim(image, config.padding);
    let image = resize::resize_to_width(image, config.max_width);

    encode::save_png(&image, &output_path).map_err(|e| BookError::OutputWriteFailed {
        path: output_path.clone(),
        detail: e.to_string(),
    })?;

    let duration = start.elapsed();
    info!(
        "{}: wrote {}x{} cover to {} in {}ms",
        book.title,
        image.width(),
        image.height(),
        output_path.display(),
        duration.as_millis()
    );

    Ok(CoverOutput {
        slug: book.slug.clone(),
        title: book.title.clone(),
        path: output_path,
        status: CoverStatus::Generated,
        width: Some(image.width()),
        height: Some(image.height()),
        duration_ms: duration.as_millis() as u64,
    })
}

fn is_reusable(output_path: &Path, config: &ExtractionConfig) -> bool {
    !config.overwrite && output_path.exists()
}

fn already_present(book: &BookSpec, path: PathBuf, took: Duration) -> CoverOutput {
    CoverOutput {
        slug: book.slug.clone(),
        title: book.title.clone(),
        path,
        status: CoverStatus::AlreadyPresent,
        width: None,
        height: None,
        duration_ms: took.as_millis() as u64,
    }
}

/// Injected fetcher, or a fresh [`HttpFetcher`] honouring the configured timeout.
fn resolve_fetcher(config: &ExtractionConfig) -> Result<Arc<dyn Fetcher>, reqwest::Error> {
    if let Some(ref fetcher) = config.fetcher {
        return Ok(Arc::clone(fetcher));
    }
    let timeout = config.download_timeout_secs.map(Duration::from_secs);
    Ok(Arc::new(HttpFetcher::new(timeout)?))
}

/// Injected rasterizer, or Ghostscript.
fn resolve_rasterizer(config: &ExtractionConfig) -> Arc<dyn Rasterizer> {
    match config.rasterizer {
        Some(ref r) => Arc::clone(r),
        None => Arc::new(GhostscriptRasterizer::new()),
    }
}
