//! Depth buffers and the offscreen scene target
//!
//! The scene renders at `min(scale_factor, max_pixel_ratio)` pixels per
//! logical pixel. On displays denser than the cap the scene goes to a
//! smaller offscreen [`RenderTarget`] that is then scaled onto the surface.

use crate::pipeline::DEPTH_FORMAT;

/// Pixel ratio used for the scene
pub fn effective_pixel_ratio(scale_factor: f64, max_pixel_ratio: f64) -> f64 {
    if max_pixel_ratio > 0.0 {
        scale_factor.min(max_pixel_ratio)
    } else {
        scale_factor
    }
}

/// Size of the scene target for a surface of `physical` pixels
///
/// Returns `None` when the scene can render straight to the surface.
pub fn scene_size(physical: (u32, u32), scale_factor: f64, max_pixel_ratio: f64) -> Option<(u32, u32)> {
    let ratio = effective_pixel_ratio(scale_factor, max_pixel_ratio);
    if scale_factor <= 0.0 || ratio >= scale_factor {
        return None;
    }
    let scale = ratio / scale_factor;
    let width = ((physical.0 as f64 * scale).round() as u32).max(1);
    let height = ((physical.1 as f64 * scale).round() as u32).max(1);
    Some((width, height))
}

/// A depth texture that follows the size of its color target
#[derive(Default)]
pub struct DepthBuffer {
    view: Option<wgpu::TextureView>,
    size: (u32, u32),
}

impl DepthBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the depth texture exists and is the right size
    pub fn ensure(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.view.is_none() || self.size != (width, height) {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.size = (width, height);
        }
    }

    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Offscreen color target for the scene
pub struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl RenderTarget {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_capped() {
        assert_eq!(effective_pixel_ratio(3.0, 2.0), 2.0);
        assert_eq!(effective_pixel_ratio(1.5, 2.0), 1.5);
        // Non-positive cap disables it
        assert_eq!(effective_pixel_ratio(3.0, 0.0), 3.0);
    }

    #[test]
    fn test_no_target_under_cap() {
        assert_eq!(scene_size((1600, 1200), 1.0, 2.0), None);
        assert_eq!(scene_size((3200, 2400), 2.0, 2.0), None);
    }

    #[test]
    fn test_target_scaled_over_cap() {
        // 3x display capped at 2x renders at two thirds of the surface
        assert_eq!(scene_size((3000, 1500), 3.0, 2.0), Some((2000, 1000)));
    }

    #[test]
    fn test_target_never_zero() {
        assert_eq!(scene_size((1, 1), 4.0, 1.0), Some((1, 1)));
    }
}
