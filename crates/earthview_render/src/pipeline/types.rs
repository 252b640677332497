//! GPU-compatible data types for the scene pipelines
//!
//! These types match the WGSL uniform and vertex layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use earthview_core::{Light, PointsMaterial, StandardMaterial, Transform3D};
use earthview_math::{Mat3, Mat4, SphereMesh};

use crate::camera::PerspectiveCamera;

/// Directional lights beyond this count are ignored
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// A vertex of a lit mesh
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Tangent direction plus handedness in `w`
    pub tangent: [f32; 4],
}

impl MeshVertex {
    /// Interleave the attribute arrays of a sphere mesh
    pub fn from_mesh(mesh: &SphereMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.uvs)
            .zip(&mesh.tangents)
            .map(|(((&position, &normal), &uv), &tangent)| Self {
                position,
                normal,
                uv,
                tangent,
            })
            .collect()
    }
}

/// Per-frame camera data (group 0, binding 0)
/// Layout: 288 bytes total (must match the `Camera` struct in every shader)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Clip space to world direction, for the sky
    pub sky: [[f32; 4]; 4],
    /// Camera position (w unused)
    pub position: [f32; 4],
    /// Target width, height (pixels), pixel ratio, unused
    pub viewport: [f32; 4],
}

impl Default for CameraUniforms {
    fn default() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view_proj: identity,
            view: identity,
            projection: identity,
            sky: identity,
            position: [0.0, 0.0, 0.0, 1.0],
            viewport: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

impl CameraUniforms {
    /// Capture a camera for a render target of `size` pixels
    pub fn new(camera: &PerspectiveCamera, size: (u32, u32), pixel_ratio: f32) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            sky: camera.sky_matrix().to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
            viewport: [size.0.max(1) as f32, size.1.max(1) as f32, pixel_ratio, 0.0],
        }
    }
}

/// A directional light as the shader sees it
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DirLight {
    /// Unit vector toward the light (w unused)
    pub direction: [f32; 4],
    /// Color times intensity (w unused)
    pub color: [f32; 4],
}

/// Scene lighting (group 0, binding 1)
/// Layout: 160 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LightUniforms {
    /// Summed ambient radiance (w unused)
    pub ambient: [f32; 4],
    /// Number of active directional lights in `x`
    pub count: [u32; 4],
    pub directional: [DirLight; MAX_DIRECTIONAL_LIGHTS],
}

impl LightUniforms {
    /// Pack a light list; ambient lights add up, directional lights fill slots in order
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut uniforms = Self::default();
        let mut count = 0;

        for light in lights {
            let [r, g, b] = light.radiance();
            match light.to_light() {
                None => {
                    uniforms.ambient[0] += r;
                    uniforms.ambient[1] += g;
                    uniforms.ambient[2] += b;
                }
                Some(dir) if count < MAX_DIRECTIONAL_LIGHTS => {
                    uniforms.directional[count] = DirLight {
                        direction: dir.extend(0.0).to_array(),
                        color: [r, g, b, 1.0],
                    };
                    count += 1;
                }
                Some(_) => {}
            }
        }

        uniforms.count[0] = count as u32;
        uniforms
    }
}

/// Standard material parameters (group 1, binding 0)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniforms {
    /// Base color (a = 1)
    pub color: [f32; 4],
    /// Emissive color times intensity
    pub emissive: [f32; 4],
    /// Roughness, metalness, normal scale, unused
    pub params: [f32; 4],
}

impl From<&StandardMaterial> for MaterialUniforms {
    fn from(m: &StandardMaterial) -> Self {
        let [r, g, b] = m.color;
        let [er, eg, eb] = m.emissive;
        let i = m.emissive_intensity;
        Self {
            color: [r, g, b, 1.0],
            emissive: [er * i, eg * i, eb * i, 1.0],
            params: [m.roughness, m.metalness, m.normal_scale, 0.0],
        }
    }
}

/// Object transform (group 2, binding 0)
/// Layout: 112 bytes, the normal matrix is stored as three padded columns
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
}

impl From<&Transform3D> for ModelUniforms {
    fn from(t: &Transform3D) -> Self {
        Self {
            model: t.matrix().to_cols_array_2d(),
            normal: pad_mat3(t.normal_matrix()),
        }
    }
}

/// Point cloud parameters (group 1, binding 0)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointsUniforms {
    pub model: [[f32; 4]; 4],
    /// Tint with opacity in `a`
    pub color: [f32; 4],
    /// Size, attenuation (0 or 1), unused, unused
    pub params: [f32; 4],
}

impl PointsUniforms {
    pub fn new(material: &PointsMaterial, transform: &Transform3D) -> Self {
        let [r, g, b] = material.color;
        Self {
            model: transform.matrix().to_cols_array_2d(),
            color: [r, g, b, material.opacity],
            params: [
                material.size,
                if material.size_attenuation { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

fn pad_mat3(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}
