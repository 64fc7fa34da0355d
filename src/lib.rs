//! # book-covers
//!
//! Turn the first page of a book's PDF into a trimmed, resized PNG cover.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL
//!  │
//!  ├─ 1. Fetch      download {slug}.pdf into the cache (skipped when cached)
//!  ├─ 2. Rasterise  Ghostscript renders page 1 → {slug}.page1.png
//!  ├─ 3. Autocrop   trim to the content bounding box + padding
//!  ├─ 4. Resize     Lanczos3 down to the maximum width (never up)
//!  └─ 5. Save       optimised PNG at {out_dir}/{output_filename}
//! ```
//!
//! Books run one at a time. A failure in one book is recorded in the
//! [`RunReport`] and the run moves on; only a missing Ghostscript stops the
//! whole run, and it does so before anything is downloaded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use book_covers::{extract_covers, BookCatalog, ExtractionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = BookCatalog::builtin();
//!     let books = catalog.select(&["learning-tactus"])?;
//!     let config = ExtractionConfig::builder().max_width(600).build()?;
//!
//!     let report = extract_covers(&books, &config)?;
//!     for line in report.failures() {
//!         eprintln!("[error] {line}");
//!     }
//!     std::process::exit(report.exit_code().into());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `extract-book-covers` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## External requirements
//!
//! Ghostscript (`gs`) must be on `PATH`, or `GHOSTSCRIPT_PATH` must point at it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod books;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use books::{BookCatalog, BookSpec};
pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{BookError, CoverError};
pub use extract::{extract_cover, extract_covers};
pub use output::{BookResult, CoverOutput, CoverStatus, RunReport, RunStats};
pub use pipeline::autocrop::{trim, BoundingBox};
pub use pipeline::fetch::{Fetcher, HttpFetcher};
pub use pipeline::rasterize::{GhostscriptRasterizer, Rasterizer};
pub use pipeline::resize::resize_to_width;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
