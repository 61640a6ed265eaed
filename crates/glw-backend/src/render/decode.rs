use std::path::Path;

use image::DynamicImage;

use crate::error::Result;

/// Decoded image, tightly packed rows, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel: 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA).
    pub channels: u32,
}

impl Image {
    /// Keeps 8-bit gray / gray-alpha / RGB / RGBA as-is; anything wider is
    /// converted to RGBA8.
    fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (pixels, channels) = match img {
            DynamicImage::ImageLuma8(buf) => (buf.into_raw(), 1),
            DynamicImage::ImageLumaA8(buf) => (buf.into_raw(), 2),
            DynamicImage::ImageRgb8(buf) => (buf.into_raw(), 3),
            DynamicImage::ImageRgba8(buf) => (buf.into_raw(), 4),
            other => (other.to_rgba8().into_raw(), 4),
        };
        Self {
            pixels,
            width,
            height,
            channels,
        }
    }
}

/// Decodes the image file at `path` with its native channel count.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image> {
    let path = path.as_ref();
    let img = image::open(path).inspect_err(|e| {
        log::warn!("failed to load image {}: {e}", path.display());
    })?;
    Ok(Image::from_dynamic(img))
}

/// Decodes an in-memory image (format sniffed from the bytes).
pub fn load_image_from_memory(bytes: &[u8]) -> Result<Image> {
    let img = image::load_from_memory(bytes).inspect_err(|e| {
        log::warn!("failed to decode image from memory: {e}");
    })?;
    Ok(Image::from_dynamic(img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use image::{GrayImage, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn gray_png_keeps_one_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_fn(3, 2, |x, y| image::Luma([(x + y * 3) as u8])).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!((img.width, img.height, img.channels), (3, 2, 1));
        assert_eq!(img.pixels, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn rgb_png_keeps_three_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgb.png");
        RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.channels, 3);
        assert_eq!(&img.pixels[..3], &[10, 20, 30]);
        assert_eq!(img.pixels.len(), 12);
    }

    #[test]
    fn decodes_from_memory() {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let img = load_image_from_memory(&bytes).unwrap();
        assert_eq!(img.pixels, vec![1, 2, 3, 4]);
        assert_eq!(img.channels, 4);
    }

    #[test]
    fn sixteen_bit_is_converted_to_rgba8() {
        let img = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(1, 1, Rgb([0xffffu16, 0, 0])));
        let out = Image::from_dynamic(img);
        assert_eq!(out.channels, 4);
        assert_eq!(out.pixels, vec![255, 0, 0, 255]);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, BackendError::ImageDecode(_)));
    }

    #[test]
    fn garbage_bytes_are_decode_error() {
        let err = load_image_from_memory(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BackendError::ImageDecode(_)));
    }
}
