use std::borrow::Cow;

use crate::error::{BackendError, Result};

/// Opaque texture handle.
///
/// Ids are non-zero; the caller owns the handle and must remove it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(u32);

impl TextureId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// Source pixel layout handed to the graphics API.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Full-texture upload. Textures are always stored as RGBA8.
#[derive(Debug, Clone)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Cow<'a, [u8]>,
}

/// Sub-rectangle of a texture, top-left origin in texel rows.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TextureRegion {
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// Validates caller pixels and picks the upload format.
///
/// Luminance (1 channel) is replicated into RGB on the CPU; 3 channels go up
/// as RGB and 4 as RGBA.
pub(crate) fn prepare_upload(
    width: u32,
    height: u32,
    channels: u32,
    pixels: &[u8],
) -> Result<TextureUpload<'_>> {
    if width == 0 || height == 0 {
        return Err(BackendError::InvalidTextureSize { width, height });
    }

    let format = match channels {
        1 | 3 => PixelFormat::Rgb,
        4 => PixelFormat::Rgba,
        n => return Err(BackendError::UnsupportedChannels(n)),
    };

    let expected = width as usize * height as usize * channels as usize;
    if pixels.len() < expected {
        return Err(BackendError::PixelSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let pixels = &pixels[..expected];

    let pixels = if channels == 1 {
        Cow::Owned(expand_luminance(pixels))
    } else {
        Cow::Borrowed(pixels)
    };

    Ok(TextureUpload {
        width,
        height,
        format,
        pixels,
    })
}

/// Replicates each gray byte into an RGB triple.
pub fn expand_luminance(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&l| [l, l, l]).collect()
}

/// Pads RGB triples to opaque RGBA.
pub fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|p| [p[0], p[1], p[2], 0xff])
        .collect()
}
