//! # gs-render
//!
//! Find a [Ghostscript](https://www.ghostscript.com/) executable and use it to
//! rasterise the first page of a PDF into an alpha-capable PNG.
//!
//! ## How it works
//!
//! [`locate_ghostscript`] resolves the executable once per process:
//!
//! 1. `GHOSTSCRIPT_PATH`, when it names an existing file.
//! 2. Otherwise the first of [`GHOSTSCRIPT_EXECUTABLES`] found on `PATH`.
//!
//! [`render_first_page`] then runs Ghostscript in safe, batch mode with the
//! `pngalpha` device, restricted to page 1:
//!
//! ```text
//! gs -dSAFER -dBATCH -dNOPAUSE -sDEVICE=pngalpha \
//!    -dFirstPage=1 -dLastPage=1 -r{dpi} -sOutputFile={png} {pdf}
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gs_render::{locate_ghostscript, render_first_page};
//! use std::path::Path;
//!
//! let gs = locate_ghostscript().expect("Ghostscript not installed");
//! render_first_page(&gs, Path::new("book.pdf"), Path::new("book.page1.png"), 250)
//!     .expect("render failed");
//! ```
//!
//! ## Environment variable overrides
//!
//! - `GHOSTSCRIPT_PATH`: path to a Ghostscript executable; skips the `PATH` search.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, warn};

// ── Public constants ─────────────────────────────────────────────────────────

/// Executable names tried, in order, when searching `PATH`.
#[cfg(windows)]
pub const GHOSTSCRIPT_EXECUTABLES: &[&str] = &["gswin64c", "gswin32c", "gs"];

/// Executable names tried, in order, when searching `PATH`.
#[cfg(not(windows))]
pub const GHOSTSCRIPT_EXECUTABLES: &[&str] = &["gs"];

/// Environment variable naming an explicit Ghostscript executable.
pub const GHOSTSCRIPT_PATH_ENV: &str = "GHOSTSCRIPT_PATH";

/// Output device: 32-bit RGBA PNG.
const PNG_DEVICE: &str = "pngalpha";

/// How many trailing stderr lines are kept in [`GhostscriptError::Failed`].
const STDERR_TAIL_LINES: usize = 8;

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by gs-render operations.
#[derive(Error, Debug)]
pub enum GhostscriptError {
    /// No Ghostscript executable could be found.
    #[error("Ghostscript not found (searched PATH for: {})", searched.join(", "))]
    NotFound { searched: Vec<String> },

    /// The process could not be started at all.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Ghostscript ran but exited unsuccessfully.
    #[error("Ghostscript exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// Ghostscript reported success but produced no file.
    #[error("Ghostscript reported success but '{path}' was not written")]
    MissingOutput { path: PathBuf },

    /// The directory for the rendered PNG could not be created.
    #[error("Could not create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ── Discovery ────────────────────────────────────────────────────────────────

static RESOLVED_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Resolves the Ghostscript executable, memoising the first success.
///
/// A failed lookup is not memoised, so installing Ghostscript mid-process
/// is picked up by the next call.
pub fn locate_ghostscript() -> Result<PathBuf, GhostscriptError> {
    if let Some(path) = RESOLVED_PATH.get() {
        return Ok(path.clone());
    }

    let path = find_ghostscript()?;
    let _ = RESOLVED_PATH.set(path.clone());
    Ok(path)
}

/// Resolves the Ghostscript executable without touching the process-wide cache.
pub fn find_ghostscript() -> Result<PathBuf, GhostscriptError> {
    if let Some(env_path) = std::env::var_os(GHOSTSCRIPT_PATH_ENV) {
        let p = PathBuf::from(env_path);
        if p.is_file() {
            debug!("Using Ghostscript from {}: {}", GHOSTSCRIPT_PATH_ENV, p.display());
            return Ok(p);
        }
        // Fall through: env var set but file missing → still search PATH.
        warn!(
            "{} '{}' not found; searching PATH instead",
            GHOSTSCRIPT_PATH_ENV,
            p.display()
        );
    }

    for exe in GHOSTSCRIPT_EXECUTABLES {
        if let Ok(path) = which::which(exe) {
            debug!("Found Ghostscript on PATH: {}", path.display());
            return Ok(path);
        }
    }

    Err(GhostscriptError::NotFound {
        searched: GHOSTSCRIPT_EXECUTABLES
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Builds the Ghostscript argument list for a single-page PNG render.
pub fn first_page_args(pdf_path: &Path, png_path: &Path, dpi: u32) -> Vec<OsString> {
    let mut output_arg = OsString::from("-sOutputFile=");
    output_arg.push(png_path.as_os_str());

    vec![
        "-dSAFER".into(),
        "-dBATCH".into(),
        "-dNOPAUSE".into(),
        format!("-sDEVICE={PNG_DEVICE}").into(),
        "-dFirstPage=1".into(),
        "-dLastPage=1".into(),
        format!("-r{dpi}").into(),
        output_arg,
        pdf_path.as_os_str().to_os_string(),
    ]
}

/// Renders page 1 of `pdf_path` into `png_path` at `dpi` using `program`.
///
/// The parent directory of `png_path` is created if needed. An existing file
/// at `png_path` is overwritten.
pub fn render_first_page(
    program: &Path,
    pdf_path: &Path,
    png_path: &Path,
    dpi: u32,
) -> Result<(), GhostscriptError> {
    if let Some(parent) = png_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GhostscriptError::OutputDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let args = first_page_args(pdf_path, png_path, dpi);
    debug!("Running {} {:?}", program.display(), args);

    let output = Command::new(program)
        .args(&args)
        .output()
        .map_err(|e| GhostscriptError::Spawn {
            program: program.to_path_buf(),
            source: e,
        })?;

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("status {code}"),
            None => "a signal".to_string(),
        };
        return Err(GhostscriptError::Failed {
            status,
            stderr: stderr_tail(&output.stderr),
        });
    }

    if !png_path.exists() {
        return Err(GhostscriptError::MissingOutput {
            path: png_path.to_path_buf(),
        });
    }

    Ok(())
}

/// Keeps the last few non-empty stderr lines; Ghostscript prefixes the real
/// error with a long banner.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    let tail = lines[start..].join("\n");
    if tail.is_empty() {
        "(no output)".to_string()
    } else {
        tail
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
