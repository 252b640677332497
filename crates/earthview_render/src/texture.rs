//! GPU textures
//!
//! Uploads decoded [`TextureAsset`]s as 2D textures or cube maps. Every
//! texture is created with a single mip level.

use earthview_core::{ColorSpace, TextureAsset, TextureFilter};

/// Error creating a cube map
#[derive(Debug, PartialEq, Eq)]
pub enum CubeMapError {
    /// Face `index` does not match the size of face 0
    FaceSizeMismatch {
        index: usize,
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Cube faces must be square
    NotSquare { width: u32, height: u32 },
}

impl std::fmt::Display for CubeMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CubeMapError::FaceSizeMismatch { index, expected, found } => write!(
                f,
                "Cube face {} is {}x{}, expected {}x{}",
                index, found.0, found.1, expected.0, expected.1
            ),
            CubeMapError::NotSquare { width, height } => {
                write!(f, "Cube faces must be square, got {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for CubeMapError {}

/// Texture format for RGBA8 data in a color space
pub fn texture_format(color_space: ColorSpace) -> wgpu::TextureFormat {
    match color_space {
        ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
    }
}

/// Sampler filter for a texture filter setting
pub fn filter_mode(filter: TextureFilter) -> wgpu::FilterMode {
    match filter {
        TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        TextureFilter::Linear => wgpu::FilterMode::Linear,
    }
}

/// Check that six faces form a valid cube map
pub fn validate_cube_faces(faces: &[&TextureAsset; 6]) -> Result<u32, CubeMapError> {
    let expected = (faces[0].width, faces[0].height);
    if expected.0 != expected.1 {
        return Err(CubeMapError::NotSquare {
            width: expected.0,
            height: expected.1,
        });
    }
    for (index, face) in faces.iter().enumerate().skip(1) {
        let found = (face.width, face.height);
        if found != expected {
            return Err(CubeMapError::FaceSizeMismatch { index, expected, found });
        }
    }
    Ok(expected.0)
}

/// A texture with its view and sampler
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Upload a 2D texture
    ///
    /// Texture coordinates repeat horizontally and clamp vertically, which
    /// suits equirectangular maps.
    pub fn from_asset(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        asset: &TextureAsset,
        color_space: ColorSpace,
        filter: TextureFilter,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: asset.width,
            height: asset.height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(color_space),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        write_layer(queue, &texture, asset, 0);

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mode = filter_mode(filter);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: mode,
            min_filter: mode,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }

    /// A 1x1 texture of a single color
    pub fn solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        color_space: ColorSpace,
        label: &str,
    ) -> Self {
        Self::from_asset(
            device,
            queue,
            &TextureAsset::solid(rgba),
            color_space,
            TextureFilter::Linear,
            label,
        )
    }

    /// Upload six faces as a cube map (+X, -X, +Y, -Y, +Z, -Z)
    pub fn cube_from_assets(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[&TextureAsset; 6],
        label: &str,
    ) -> Result<Self, CubeMapError> {
        let edge = validate_cube_faces(faces)?;
        Ok(Self::create_cube(device, queue, faces, edge, label))
    }

    fn create_cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[&TextureAsset; 6],
        edge: u32,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: edge,
                height: edge,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(ColorSpace::Srgb),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.iter().enumerate() {
            write_layer(queue, &texture, face, layer as u32);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }

    /// A single-color cube map
    pub fn solid_cube(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        let face = TextureAsset::solid(rgba);
        let faces = [&face, &face, &face, &face, &face, &face];
        Self::create_cube(device, queue, &faces, 1, label)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

fn write_layer(queue: &wgpu::Queue, texture: &wgpu::Texture, asset: &TextureAsset, layer: u32) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d { x: 0, y: 0, z: layer },
            aspect: wgpu::TextureAspect::All,
        },
        &asset.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(asset.row_bytes()),
            rows_per_image: Some(asset.height),
        },
        wgpu::Extent3d {
            width: asset.width,
            height: asset.height,
            depth_or_array_layers: 1,
        },
    );
}
