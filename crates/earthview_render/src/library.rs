//! Texture resolution for materials and backgrounds
//!
//! Texture references are resolved against an asset directory, decoded
//! through the [`AssetCache`], and uploaded once per distinct reference.
//! A texture that cannot be read is replaced with a fallback and a warning
//! is logged; rendering never fails on a missing file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use earthview_core::{AssetCache, AssetError, ColorSpace, TextureAsset, TextureFilter, TextureRef};

use crate::texture::GpuTexture;

/// Edge length of the generated star sprite
const SPRITE_SIZE: u32 = 64;

/// Stand-in for a missing texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fallback {
    /// Opaque white, neutral for color, emissive and roughness maps
    White,
    /// Unperturbed tangent-space normal
    FlatNormal,
    /// Soft round sprite for points
    Sprite,
}

impl Fallback {
    pub fn asset(self) -> TextureAsset {
        match self {
            Fallback::White => TextureAsset::solid([255, 255, 255, 255]),
            Fallback::FlatNormal => TextureAsset::flat_normal(),
            Fallback::Sprite => TextureAsset::radial_sprite(SPRITE_SIZE),
        }
    }

    fn color_space(self) -> ColorSpace {
        match self {
            Fallback::FlatNormal => ColorSpace::Linear,
            Fallback::White | Fallback::Sprite => ColorSpace::Srgb,
        }
    }
}

/// Uploaded textures keyed by reference
pub struct TextureLibrary {
    asset_dir: PathBuf,
    cache: AssetCache,
    uploaded: HashMap<TextureRef, Arc<GpuTexture>>,
    fallbacks: HashMap<Fallback, Arc<GpuTexture>>,
}

impl TextureLibrary {
    pub fn new(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            cache: AssetCache::new(),
            uploaded: HashMap::new(),
            fallbacks: HashMap::new(),
        }
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    /// Full path of a texture reference
    pub fn resolve(&self, texture: &TextureRef) -> PathBuf {
        self.asset_dir.join(&texture.path)
    }

    /// Decode a referenced image, going through the cache
    pub fn load_asset(&mut self, texture: &TextureRef) -> Result<Arc<TextureAsset>, AssetError> {
        let path = self.resolve(texture);
        self.cache.load_shared::<TextureAsset>(path)
    }

    /// Number of decoded images held in the cache
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// GPU texture for an optional reference, or `fallback` when absent or unreadable
    pub fn texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: Option<&TextureRef>,
        fallback: Fallback,
    ) -> Arc<GpuTexture> {
        let Some(texture) = texture else {
            return self.fallback(device, queue, fallback);
        };

        if let Some(uploaded) = self.uploaded.get(texture) {
            return Arc::clone(uploaded);
        }

        match self.load_asset(texture) {
            Ok(asset) => {
                log::info!(
                    "Loaded texture {} ({}x{})",
                    texture.path,
                    asset.width,
                    asset.height
                );
                let gpu = Arc::new(GpuTexture::from_asset(
                    device,
                    queue,
                    &asset,
                    texture.color_space,
                    texture.filter,
                    &texture.path,
                ));
                self.uploaded.insert(texture.clone(), Arc::clone(&gpu));
                gpu
            }
            Err(e) => {
                log::warn!(
                    "Failed to load texture {}: {}; using fallback",
                    self.resolve(texture).display(),
                    e
                );
                self.fallback(device, queue, fallback)
            }
        }
    }

    /// Cube map from six face references; black when any face is unusable
    pub fn cube(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, faces: &[TextureRef; 6]) -> GpuTexture {
        let mut assets = Vec::with_capacity(6);
        for face in faces {
            match self.load_asset(face) {
                Ok(asset) => assets.push(asset),
                Err(e) => {
                    log::warn!(
                        "Failed to load cube face {}: {}; using a black sky",
                        self.resolve(face).display(),
                        e
                    );
                    return GpuTexture::solid_cube(device, queue, [0, 0, 0, 255], "Fallback Sky");
                }
            }
        }

        let refs = [&*assets[0], &*assets[1], &*assets[2], &*assets[3], &*assets[4], &*assets[5]];
        match GpuTexture::cube_from_assets(device, queue, &refs, "Sky") {
            Ok(cube) => {
                log::info!("Loaded sky cube map ({}px faces)", assets[0].width);
                cube
            }
            Err(e) => {
                log::warn!("Invalid cube map: {}; using a black sky", e);
                GpuTexture::solid_cube(device, queue, [0, 0, 0, 255], "Fallback Sky")
            }
        }
    }

    fn fallback(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, fallback: Fallback) -> Arc<GpuTexture> {
        let entry = self.fallbacks.entry(fallback).or_insert_with(|| {
            Arc::new(GpuTexture::from_asset(
                device,
                queue,
                &fallback.asset(),
                fallback.color_space(),
                TextureFilter::Linear,
                "Fallback Texture",
            ))
        });
        Arc::clone(entry)
    }
}
