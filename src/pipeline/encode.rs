//! Image I/O: decode the intermediate render, encode the final cover.
//!
//! Covers are committed to a website's source tree, so the PNG is written
//! with the encoder's best compression and adaptive row filtering. The file
//! is assembled in a temp file next to the destination and renamed into
//! place, so an existing cover is never left half-overwritten.
//!
//! Decoding raises the `image` crate's default 512 MiB allocation cap to
//! [`MAX_DECODE_ALLOC`]: a US-letter page rendered at
//! [`crate::config::MAX_DPI`] is about 2 GiB of RGBA.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageReader, Limits};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Largest buffer the decoder may allocate for one render (3 GiB).
pub const MAX_DECODE_ALLOC: u64 = 3 << 30;

/// Decode an image file, sniffing the format from its content.
pub fn load_image(path: &Path) -> Result<DynamicImage, image::ImageError> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.limits(decode_limits());
    let img = reader.decode()?;
    debug!(
        "Decoded {} → {}x{} {:?}",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    Ok(img)
}

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits
}

/// Encode `img` as an optimised PNG into `writer`.
pub fn encode_png<W: Write>(img: &DynamicImage, writer: W) -> Result<(), image::ImageError> {
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive);
    img.write_with_encoder(encoder)
}

/// Save `img` as an optimised PNG at `path`, creating parent directories.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<(), image::ImageError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_png(img, &mut writer)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| image::ImageError::IoError(e.error))?;

    debug!("Saved {}x{} PNG → {}", img.width(), img.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn save_then_load_keeps_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/cover.png");
        let mut buf = RgbaImage::from_pixel(12, 7, Rgba([255, 255, 255, 255]));
        buf.put_pixel(3, 4, Rgba([1, 2, 3, 128]));
        let img = DynamicImage::ImageRgba8(buf);

        save_png(&img, &path).expect("save should succeed");
        let back = load_image(&path).expect("load should succeed");

        assert_eq!(back, img);
    }

    #[test]
    fn letter_page_at_max_dpi_fits_the_decode_limit() {
        let dpi = crate::config::MAX_DPI as u64;
        let (w, h) = (85 * dpi / 10, 11 * dpi);
        assert!(w * h * 4 <= MAX_DECODE_ALLOC, "{w}x{h} RGBA exceeds the limit");
        assert_eq!(decode_limits().max_alloc, Some(MAX_DECODE_ALLOC));
    }

    #[test]
    fn encoded_bytes_are_png() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        let mut bytes = Vec::new();
        encode_png(&img, &mut bytes).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn garbage_does_not_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(load_image(&path).is_err());
    }

    #[test]
    fn save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"old").unwrap();

        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([5, 6, 7])));
        save_png(&img, &path).unwrap();

        assert_eq!(load_image(&path).unwrap().to_rgb8().dimensions(), (3, 2));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
