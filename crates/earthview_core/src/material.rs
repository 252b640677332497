//! Material types
//!
//! Two materials cover the scene: a metallic-roughness [`StandardMaterial`]
//! for lit meshes and a sprite-based [`PointsMaterial`] for point clouds.
//! Textures are referenced by path and resolved by the renderer.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Render state flags derived from a material
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u8 {
        /// Blend with what is already in the framebuffer
        const TRANSPARENT = 1 << 0;
        /// Write to the depth buffer
        const DEPTH_WRITE = 1 << 1;
        /// Point size shrinks with distance from the camera
        const SIZE_ATTENUATION = 1 << 2;
    }
}

/// How texel values are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// Color data, decoded from sRGB on sampling
    #[default]
    Srgb,
    /// Non-color data (normals, roughness)
    Linear,
}

/// Texture sampling filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureFilter {
    Nearest,
    #[default]
    Linear,
}

/// Reference to a texture file
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureRef {
    /// Path relative to the asset directory
    pub path: String,
    #[serde(default)]
    pub color_space: ColorSpace,
    #[serde(default)]
    pub filter: TextureFilter,
}

impl TextureRef {
    /// A color texture (sRGB, linear filtering)
    pub fn srgb(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Srgb,
            filter: TextureFilter::Linear,
        }
    }

    /// A data texture (linear color space, linear filtering)
    pub fn linear(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            color_space: ColorSpace::Linear,
            filter: TextureFilter::Linear,
        }
    }

    /// Builder: set the sampling filter
    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Metallic-roughness surface material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardMaterial {
    /// Base color multiplier (linear RGB)
    pub color: [f32; 3],
    /// Albedo texture
    pub map: Option<TextureRef>,
    /// Tangent-space normal map
    pub normal_map: Option<TextureRef>,
    /// Normal map strength
    pub normal_scale: f32,
    /// Emission texture, multiplied by `emissive * emissive_intensity`
    pub emissive_map: Option<TextureRef>,
    /// Emissive color (linear RGB)
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    /// Roughness texture (green channel)
    pub roughness_map: Option<TextureRef>,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            map: None,
            normal_map: None,
            normal_scale: 1.0,
            emissive_map: None,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 1.0,
            roughness_map: None,
            roughness: 1.0,
            metalness: 0.0,
        }
    }
}

impl StandardMaterial {
    /// All textures referenced by this material
    pub fn textures(&self) -> impl Iterator<Item = &TextureRef> {
        [&self.map, &self.normal_map, &self.emissive_map, &self.roughness_map]
            .into_iter()
            .flatten()
    }
}

/// Sprite material for point clouds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsMaterial {
    /// Sprite texture
    pub map: Option<TextureRef>,
    /// Tint (linear RGB)
    pub color: [f32; 3],
    /// Point size; world-scaled when attenuated, pixels otherwise
    pub size: f32,
    pub size_attenuation: bool,
    pub transparent: bool,
    pub depth_write: bool,
    pub opacity: f32,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            map: None,
            color: [1.0, 1.0, 1.0],
            size: 1.0,
            size_attenuation: true,
            transparent: false,
            depth_write: true,
            opacity: 1.0,
        }
    }
}

impl PointsMaterial {
    /// Render state flags for this material
    pub fn flags(&self) -> MaterialFlags {
        let mut flags = MaterialFlags::empty();
        flags.set(MaterialFlags::TRANSPARENT, self.transparent);
        flags.set(MaterialFlags::DEPTH_WRITE, self.depth_write);
        flags.set(MaterialFlags::SIZE_ATTENUATION, self.size_attenuation);
        flags
    }
}
