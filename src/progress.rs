//! Progress-callback trait for per-book extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to hear about
//! each book as the run moves through the selection. The CLI uses it to print
//! an `[ok]` line the moment each cover is written.
//!
//! # Example
//!
//! ```rust
//! use book_covers::{CoverOutput, ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_book_complete(&self, index: usize, total: usize, output: &CoverOutput) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, output.path.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::books::BookSpec;
use crate::error::BookError;
use crate::output::CoverOutput;
use std::sync::Arc;

/// Called by the orchestrator as it processes each book.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Books are processed one at a time, in selection
/// order; `index` is 1-based.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once, after the rasterizer check passed and before any book.
    fn on_run_start(&self, total_books: usize) {
        let _ = total_books;
    }

    /// Called before a book's cache/overwrite checks.
    fn on_book_start(&self, index: usize, total_books: usize, book: &BookSpec) {
        let _ = (index, total_books, book);
    }

    /// Called when a cover was generated or was already present.
    fn on_book_complete(&self, index: usize, total_books: usize, output: &CoverOutput) {
        let _ = (index, total_books, output);
    }

    /// Called when a book failed. The run continues with the next book.
    fn on_book_error(&self, index: usize, total_books: usize, book: &BookSpec, error: &BookError) {
        let _ = (index, total_books, book, error);
    }

    /// Called once after every selected book has been attempted.
    fn on_run_complete(&self, total_books: usize, success_count: usize) {
        let _ = (total_books, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
