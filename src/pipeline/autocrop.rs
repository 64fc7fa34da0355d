//! Autocrop: trim a rendered page down to its printed content.
//!
//! The background colour is whatever the top-left pixel holds. A pixel
//! counts as content when any colour channel differs from that background;
//! alpha is ignored. This is background subtraction, not a fixed margin, so
//! it copes with different page sizes, margins and background tints. Pages
//! with gradient or noisy backgrounds will not trim cleanly; the single
//! corner sample is kept on purpose so output stays stable across versions.

use image::{DynamicImage, GenericImageView, ImageBuffer, Pixel};
use tracing::debug;

/// Padding added around the detected content, in pixels.
pub const DEFAULT_PADDING: u32 = 8;

/// Only R, G and B take part in the comparison.
const COLOR_CHANNELS: usize = 3;

/// Pixel rectangle; `left`/`top` inclusive, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Grow by `padding` on every side, clamped to a `width × height` image.
    pub fn expand(self, padding: u32, width: u32, height: u32) -> Self {
        Self {
            left: self.left.saturating_sub(padding),
            top: self.top.saturating_sub(padding),
            right: self.right.saturating_add(padding).min(width),
            bottom: self.bottom.saturating_add(padding).min(height),
        }
    }
}

/// Convert anything that is not 8-bit RGB or RGBA into RGBA8.
pub fn normalize(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    }
}

/// Bounding box of every pixel whose colour differs from the top-left pixel.
///
/// Returns `None` for an empty image or one made of a single colour.
pub fn content_bounds(img: &DynamicImage) -> Option<BoundingBox> {
    match img {
        DynamicImage::ImageRgb8(buf) => bounds_of(buf),
        DynamicImage::ImageRgba8(buf) => bounds_of(buf),
        other => bounds_of(&other.to_rgba8()),
    }
}

fn bounds_of<P>(buf: &ImageBuffer<P, Vec<u8>>) -> Option<BoundingBox>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = buf.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let background = *buf.get_pixel(0, 0);
    let bg = &background.channels()[..COLOR_CHANNELS];

    let mut found: Option<BoundingBox> = None;
    for (x, y, pixel) in buf.enumerate_pixels() {
        if &pixel.channels()[..COLOR_CHANNELS] == bg {
            continue;
        }
        found = Some(match found {
            None => BoundingBox {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            },
            Some(b) => BoundingBox {
                left: b.left.min(x),
                top: b.top.min(y),
                right: b.right.max(x + 1),
                bottom: b.bottom.max(y + 1),
            },
        });
    }
    found
}

/// Crop `img` to its content plus `padding`.
///
/// A uniform image comes back unchanged (after [`normalize`]).
pub fn trim(img: DynamicImage, padding: u32) -> DynamicImage {
    let img = normalize(img);
    let Some(content) = content_bounds(&img) else {
        debug!("No content detected; leaving {}x{} image untouched", img.width(), img.height());
        return img;
    };

    let (width, height) = img.dimensions();
    let crop = content.expand(padding, width, height);
    debug!(
        "Trimming {}x{} → {}x{} (content {:?}, crop {:?})",
        width,
        height,
        crop.width(),
        crop.height(),
        content,
        crop
    );
    img.crop_imm(crop.left, crop.top, crop.width(), crop.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn square_on_background(size: u32, at: (u32, u32), side: u32) -> DynamicImage {
        let mut img = RgbImage::from_pixel(size, size, Rgb([255, 255, 255]));
        for y in at.1..at.1 + side {
            for x in at.0..at.0 + side {
                img.put_pixel(x, y, Rgb([20, 30, 40]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn uniform_image_is_returned_unchanged() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(100, 100, Rgb([200, 10, 10])));
        assert_eq!(content_bounds(&img), None);

        let out = trim(img.clone(), DEFAULT_PADDING);
        assert_eq!(out.dimensions(), (100, 100));
        assert_eq!(out, img);
    }

    #[test]
    fn padding_is_clamped_to_the_image() {
        let img = square_on_background(200, (5, 5), 10);
        assert_eq!(
            content_bounds(&img),
            Some(BoundingBox {
                left: 5,
                top: 5,
                right: 15,
                bottom: 15
            })
        );

        let out = trim(img, 8);
        // (max(0,5-8), max(0,5-8), min(200,15+8), min(200,15+8)) = (0,0,23,23)
        assert_eq!(out.dimensions(), (23, 23));
    }

    #[test]
    fn interior_content_gets_full_padding() {
        let img = square_on_background(200, (50, 60), 20);
        let out = trim(img, 8);
        assert_eq!(out.dimensions(), (20 + 16, 20 + 16));
        // The crop starts 8 px before the square, so the square begins at (8, 8).
        let px = out.to_rgb8();
        assert_eq!(px.get_pixel(7, 7), &Rgb([255, 255, 255]));
        assert_eq!(px.get_pixel(8, 8), &Rgb([20, 30, 40]));
    }

    #[test]
    fn content_touching_the_far_edge_is_clamped() {
        let img = square_on_background(100, (90, 95), 5);
        let out = trim(img, 8);
        // left 82, top 87, right min(100, 103), bottom min(100, 108)
        assert_eq!(out.dimensions(), (18, 13));
    }

    #[test]
    fn content_from_origin_still_crops() {
        // Background sampled at (0,0) is the content colour; the "hole" is
        // what differs, and the box covers it.
        let mut img = RgbImage::from_pixel(50, 50, Rgb([0, 0, 0]));
        for y in 40..50 {
            for x in 40..50 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let out = trim(DynamicImage::ImageRgb8(img), 8);
        assert_eq!(out.dimensions(), (18, 18));
    }

    #[test]
    fn alpha_only_differences_are_ignored() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 0]));
        img.put_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let img = DynamicImage::ImageRgba8(img);

        assert_eq!(content_bounds(&img), None);
        assert_eq!(trim(img, 8).dimensions(), (40, 40));
    }

    #[test]
    fn colour_under_transparency_still_counts() {
        let mut img = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0]));
        img.put_pixel(20, 30, Rgba([10, 0, 0, 0]));
        let bounds = content_bounds(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(
            bounds,
            BoundingBox {
                left: 20,
                top: 30,
                right: 21,
                bottom: 31
            }
        );
    }

    #[test]
    fn grayscale_input_is_normalized_to_rgba() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(10, 10, Luma([7])));
        let out = trim(img, 8);
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn expand_saturates_at_zero_and_bounds() {
        let b = BoundingBox {
            left: 3,
            top: 0,
            right: 97,
            bottom: 50,
        };
        assert_eq!(
            b.expand(8, 100, 52),
            BoundingBox {
                left: 0,
                top: 0,
                right: 100,
                bottom: 52
            }
        );
    }
}
