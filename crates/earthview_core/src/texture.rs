//! Decoded texture images
//!
//! Images are decoded to tightly packed RGBA8 with the first row at the top,
//! matching the wgpu texture origin. Fallback textures are generated in
//! memory for when a file is missing.

use std::path::Path;
use crate::asset_cache::Asset;
use crate::asset_error::AssetError;

/// An RGBA8 image
#[derive(Clone, Debug, PartialEq)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major, top row first
    pub pixels: Vec<u8>,
}

impl Asset for TextureAsset {
    fn load_from_file(path: &Path) -> Result<Self, AssetError> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        log::debug!("Decoded {} ({}x{})", path.display(), width, height);
        Self::from_rgba8(width, height, image.into_raw())
    }
}

impl TextureAsset {
    /// Wrap raw RGBA8 pixels, checking the buffer size
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Decode(format!("empty image ({}x{})", width, height)));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AssetError::Decode(format!(
                "expected {} bytes for {}x{} RGBA8, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// A 1x1 texture of a single color
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    /// Flat tangent-space normal (0, 0, 1)
    pub fn flat_normal() -> Self {
        Self::solid([128, 128, 255, 255])
    }

    /// A white disc fading to transparent at the edge, used as a star sprite
    pub fn radial_sprite(size: u32) -> Self {
        let size = size.max(2);
        let center = (size as f32 - 1.0) * 0.5;
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 - center) / center;
                let dy = (y as f32 - center) / center;
                let d = (dx * dx + dy * dy).sqrt();
                let falloff = (1.0 - d).clamp(0.0, 1.0);
                let alpha = (falloff * falloff * 255.0).round() as u8;
                pixels.extend_from_slice(&[255, 255, 255, alpha]);
            }
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Bytes per row
    #[inline]
    pub fn row_bytes(&self) -> u32 {
        self.width * 4
    }

    /// RGBA of the pixel at (x, y), if in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = &self.pixels[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}
