//! Configuration types for cover extraction.
//!
//! Every knob lives in [`ExtractionConfig`], built via its
//! [`ExtractionConfigBuilder`]. The two external collaborators (downloader
//! and rasterizer) and the progress callback are injected here too, so
//! tests and embedders can replace them without a second API surface.

use crate::error::CoverError;
use crate::pipeline::autocrop::DEFAULT_PADDING;
use crate::pipeline::fetch::Fetcher;
use crate::pipeline::rasterize::Rasterizer;
use crate::pipeline::resize::DEFAULT_MAX_WIDTH;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default output directory, relative to the website source tree.
pub const DEFAULT_OUT_DIR: &str = "src/images/books";

/// Default cache directory for downloaded PDFs and intermediate renders.
pub const DEFAULT_CACHE_DIR: &str = ".cache/book-covers";

/// Default render resolution.
pub const DEFAULT_DPI: u32 = 250;

/// Highest accepted render resolution.
pub const MAX_DPI: u32 = 2400;

/// Configuration for a cover-extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use book_covers::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .out_dir("public/covers")
///     .dpi(300)
///     .max_width(600)
///     .allow_download(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_width, 600);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Where final `{output_filename}` PNGs are written. Default: `src/images/books`.
    pub out_dir: PathBuf,

    /// Where `{slug}.pdf` and `{slug}.page1.png` are kept. Default: `.cache/book-covers`.
    pub cache_dir: PathBuf,

    /// Ghostscript render resolution. Range: 1–2400. Default: 250.
    ///
    /// 250 DPI puts a US-letter cover at roughly 2100 px wide, comfortably
    /// above the default output width so the final image is always a
    /// downscale.
    pub dpi: u32,

    /// Maximum output width in pixels. Default: 900. Narrower covers are
    /// never upscaled.
    pub max_width: u32,

    /// Pixels kept around the detected content when trimming. Default: 8.
    pub padding: u32,

    /// Regenerate covers whose output file already exists. Default: false.
    pub overwrite: bool,

    /// Download missing PDFs. When false, a missing cached PDF fails that
    /// book. Default: true.
    pub allow_download: bool,

    /// HTTP timeout for PDF downloads. Default: none.
    pub download_timeout_secs: Option<u64>,

    /// Pre-constructed downloader. Default: [`crate::pipeline::fetch::HttpFetcher`].
    pub fetcher: Option<Arc<dyn Fetcher>>,

    /// Pre-constructed rasterizer. Default: [`crate::pipeline::rasterize::GhostscriptRasterizer`].
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Per-book progress events. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            dpi: DEFAULT_DPI,
            max_width: DEFAULT_MAX_WIDTH,
            padding: DEFAULT_PADDING,
            overwrite: false,
            allow_download: true,
            download_timeout_secs: None,
            fetcher: None,
            rasterizer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("out_dir", &self.out_dir)
            .field("cache_dir", &self.cache_dir)
            .field("dpi", &self.dpi)
            .field("max_width", &self.max_width)
            .field("padding", &self.padding)
            .field("overwrite", &self.overwrite)
            .field("allow_download", &self.allow_download)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("fetcher", &self.fetcher.as_ref().map(|_| "<dyn Fetcher>"))
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.out_dir = dir.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = px;
        self
    }

    pub fn padding(mut self, px: u32) -> Self {
        self.config.padding = px;
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn allow_download(mut self, v: bool) -> Self {
        self.config.allow_download = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.config.fetcher = Some(fetcher);
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, CoverError> {
        let c = &self.config;
        if c.dpi == 0 || c.dpi > MAX_DPI {
            return Err(CoverError::InvalidConfig(format!(
                "DPI must be 1–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.max_width == 0 {
            return Err(CoverError::InvalidConfig(
                "Maximum width must be ≥ 1".into(),
            ));
        }
        if c.download_timeout_secs == Some(0) {
            return Err(CoverError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}
