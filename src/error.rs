//! Error types for the book-covers library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`CoverError`] — **Fatal**: the run cannot proceed at all (Ghostscript
//!   missing, unknown book selected, invalid configuration). Returned as
//!   `Err(CoverError)` from [`crate::extract::extract_covers`].
//!
//! * [`BookError`] — **Non-fatal**: a single book failed (download, render,
//!   decode) but the others are unaffected. Stored inside
//!   [`crate::output::BookResult`] so the run keeps going and every failure
//!   is reported together at the end.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a run where at least one book failed.
pub const EXIT_BOOK_FAILED: u8 = 1;

/// Exit code for a run that never started because Ghostscript is missing.
pub const EXIT_DEPENDENCY_MISSING: u8 = 2;

/// All fatal errors returned by the book-covers library.
///
/// Book-level failures use [`BookError`] and are stored in
/// [`crate::output::BookResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum CoverError {
    // ── Environment errors ────────────────────────────────────────────────
    /// The external rasterizer is not installed. No book was attempted.
    #[error("Missing dependency: `{program}` ({name}). Install {name} and retry.")]
    DependencyMissing { program: String, name: String },

    // ── Selection / config errors ─────────────────────────────────────────
    /// A `--book` selector does not name a known book.
    #[error("Unknown book '{slug}' (known: {})", known.join(", "))]
    UnknownBook { slug: String, known: Vec<String> },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Run outcome ───────────────────────────────────────────────────────
    /// Some books succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::RunReport::into_result`] when the caller
    /// wants to treat any book failure as an error.
    #[error("{failed}/{total} books failed")]
    PartialFailure { failed: usize, total: usize },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoverError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CoverError::DependencyMissing { .. } => EXIT_DEPENDENCY_MISSING,
            _ => EXIT_BOOK_FAILED,
        }
    }
}

/// A non-fatal error for a single book.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BookError {
    /// The source PDF is not cached and downloads are disabled.
    #[error("PDF not found at {} and downloads are disabled.", path.display())]
    DownloadDisabled { path: PathBuf },

    /// Network or I/O failure while downloading the source PDF.
    #[error("Failed to download '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    /// Ghostscript could not be run or exited unsuccessfully.
    #[error("Rasterisation of '{}' failed: {detail}", pdf.display())]
    RasterisationFailed { pdf: PathBuf, detail: String },

    /// The rendered PNG could not be decoded or processed.
    #[error("Image processing failed for '{}': {detail}", path.display())]
    ImageFailed { path: PathBuf, detail: String },

    /// The final PNG could not be written.
    #[error("Failed to write '{}': {detail}", path.display())]
    OutputWriteFailed { path: PathBuf, detail: String },
}
