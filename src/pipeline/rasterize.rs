//! Rasterise: render page 1 of a cached PDF into the cached intermediate PNG.
//!
//! Rendering is delegated to Ghostscript through the `gs-render` crate.
//! The [`Rasterizer`] trait exists so the orchestrator can be driven by a
//! different renderer (or a fake one in tests) without touching the policy
//! code in [`crate::extract`].

use crate::error::{BookError, CoverError};
use gs_render::GhostscriptError;
use std::path::Path;
use tracing::{debug, info};

/// Renders the first page of a PDF to PNG.
pub trait Rasterizer: Send + Sync {
    /// Confirm the renderer can run at all. Called once per run, before
    /// any book is attempted.
    fn check_available(&self) -> Result<(), CoverError>;

    /// Render page 1 of `pdf_path` into `png_path` at `dpi`.
    fn render_first_page(&self, pdf_path: &Path, png_path: &Path, dpi: u32)
        -> Result<(), BookError>;
}

/// Ghostscript-backed [`Rasterizer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct GhostscriptRasterizer;

impl GhostscriptRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for GhostscriptRasterizer {
    fn check_available(&self) -> Result<(), CoverError> {
        let path = gs_render::locate_ghostscript().map_err(dependency_missing)?;
        debug!("Ghostscript available at {}", path.display());
        Ok(())
    }

    fn render_first_page(
        &self,
        pdf_path: &Path,
        png_path: &Path,
        dpi: u32,
    ) -> Result<(), BookError> {
        let failed = |e: GhostscriptError| BookError::RasterisationFailed {
            pdf: pdf_path.to_path_buf(),
            detail: e.to_string(),
        };

        let gs = gs_render::locate_ghostscript().map_err(failed)?;
        info!(
            "Rendering page 1 of {} at {} DPI",
            pdf_path.display(),
            dpi
        );
        gs_render::render_first_page(&gs, pdf_path, png_path, dpi).map_err(failed)?;
        debug!("Rendered page 1 → {}", png_path.display());
        Ok(())
    }
}

fn dependency_missing(e: GhostscriptError) -> CoverError {
    debug!("Ghostscript lookup failed: {}", e);
    CoverError::DependencyMissing {
        program: "gs".to_string(),
        name: "Ghostscript".to_string(),
    }
}
