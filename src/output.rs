//! Result types produced by a cover-extraction run.
//!
//! A [`RunReport`] holds one [`BookResult`] per selected book, in the order
//! they were processed, plus aggregate [`RunStats`]. Failures live inside the
//! report instead of aborting the run, so a caller always gets every cover
//! that could be produced and decides afterwards how to treat the rest
//! (see [`RunReport::exit_code`] and [`RunReport::into_result`]).

use crate::error::{BookError, CoverError, EXIT_BOOK_FAILED};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether the cover was produced by this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverStatus {
    /// Rendered, cropped, resized and written.
    Generated,
    /// The output file existed and overwriting was off; nothing was done.
    AlreadyPresent,
}

/// A cover that exists on disk after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverOutput {
    pub slug: String,
    pub title: String,
    /// Location of the final PNG.
    pub path: PathBuf,
    pub status: CoverStatus,
    /// Final pixel width; `None` for [`CoverStatus::AlreadyPresent`].
    pub width: Option<u32>,
    /// Final pixel height; `None` for [`CoverStatus::AlreadyPresent`].
    pub height: Option<u32>,
    pub duration_ms: u64,
}

impl CoverOutput {
    /// `"[ok] {title}: {path}"`, the line printed on stdout for this cover.
    pub fn ok_line(&self) -> String {
        format!("[ok] {}: {}", self.title, self.path.display())
    }
}

/// Outcome for one book. Exactly one of `output` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookResult {
    pub slug: String,
    pub title: String,
    pub output: Option<CoverOutput>,
    pub error: Option<BookError>,
}

impl BookResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// `"{title}: {message}"` for a failed book.
    pub fn failure_line(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("{}: {}", self.title, e))
    }
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total: usize,
    pub generated: usize,
    pub already_present: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub results: Vec<BookResult>,
    pub stats: RunStats,
}

impl RunReport {
    /// Build a report, deriving the counts from `results`.
    pub fn new(results: Vec<BookResult>, duration_ms: u64) -> Self {
        let count = |status: CoverStatus| {
            results
                .iter()
                .filter_map(|r| r.output.as_ref())
                .filter(|o| o.status == status)
                .count()
        };
        let stats = RunStats {
            total: results.len(),
            generated: count(CoverStatus::Generated),
            already_present: count(CoverStatus::AlreadyPresent),
            failed: results.iter().filter(|r| !r.is_success()).count(),
            duration_ms,
        };
        Self { results, stats }
    }

    pub fn is_success(&self) -> bool {
        self.stats.failed == 0
    }

    pub fn outputs(&self) -> impl Iterator<Item = &CoverOutput> {
        self.results.iter().filter_map(|r| r.output.as_ref())
    }

    /// One `"{title}: {message}"` line per failed book, in run order.
    pub fn failures(&self) -> Vec<String> {
        self.results.iter().filter_map(BookResult::failure_line).collect()
    }

    /// 0 when every book succeeded, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            EXIT_BOOK_FAILED
        }
    }

    /// Treat any book failure as an error.
    pub fn into_result(self) -> Result<Self, CoverError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(CoverError::PartialFailure {
                failed: self.stats.failed,
                total: self.stats.total,
            })
        }
    }
}
