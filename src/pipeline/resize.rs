//! Resize: cap the cover width, preserving aspect ratio.
//!
//! Lanczos3 is used because covers are downscaled from a 250 DPI render
//! (roughly 2000 px wide) to under 1000 px; a windowed-sinc filter keeps
//! small type legible where bilinear or nearest would alias.

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Default maximum output width, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 900;

/// Height that keeps the aspect ratio of `width × height` at `max_width`.
///
/// Ties round to even, so 2.5 → 2 and 3.5 → 4. Never returns 0.
pub fn scaled_height(width: u32, height: u32, max_width: u32) -> u32 {
    let exact = height as f64 * (max_width as f64 / width as f64);
    (exact.round_ties_even() as u32).max(1)
}

/// Downscale `img` to `max_width` if it is wider; never upscales.
pub fn resize_to_width(img: DynamicImage, max_width: u32) -> DynamicImage {
    if img.width() <= max_width {
        return img;
    }

    let new_height = scaled_height(img.width(), img.height(), max_width);
    debug!(
        "Resizing {}x{} → {}x{}",
        img.width(),
        img.height(),
        max_width,
        new_height
    );
    img.resize_exact(max_width, new_height, FilterType::Lanczos3)
}
