//! Sphere tessellation
//!
//! Builds a UV sphere on a latitude/longitude grid. Rows run from the north
//! pole (`v = 0`) to the south pole (`v = 1`), columns wrap once around the
//! Y axis. The seam column is duplicated so texture coordinates stay
//! continuous, and each pole row emits a single triangle per quad.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Parameters of a latitude/longitude sphere
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereGeometry {
    /// Sphere radius
    pub radius: f32,
    /// Number of segments around the equator
    pub width_segments: u32,
    /// Number of segments from pole to pole
    pub height_segments: u32,
}

impl Default for SphereGeometry {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 32,
            height_segments: 16,
        }
    }
}

/// Tessellated sphere data ready to be interleaved into a vertex buffer
#[derive(Clone, Debug, Default)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Tangent (xyz) along increasing `u`, with handedness in `w`
    pub tangents: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl SphereGeometry {
    /// Minimum segments around the equator
    pub const MIN_WIDTH_SEGMENTS: u32 = 3;
    /// Minimum segments from pole to pole
    pub const MIN_HEIGHT_SEGMENTS: u32 = 2;

    /// Create sphere parameters, clamping segment counts to their minimums
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(Self::MIN_WIDTH_SEGMENTS),
            height_segments: height_segments.max(Self::MIN_HEIGHT_SEGMENTS),
        }
    }

    /// Expected vertex count: `(w + 1) * (h + 1)`
    pub fn vertex_count(&self) -> usize {
        let w = self.width_segments.max(Self::MIN_WIDTH_SEGMENTS) as usize;
        let h = self.height_segments.max(Self::MIN_HEIGHT_SEGMENTS) as usize;
        (w + 1) * (h + 1)
    }

    /// Expected triangle count: two per quad, one per pole quad
    pub fn triangle_count(&self) -> usize {
        let w = self.width_segments.max(Self::MIN_WIDTH_SEGMENTS) as usize;
        let h = self.height_segments.max(Self::MIN_HEIGHT_SEGMENTS) as usize;
        2 * w * (h - 1)
    }

    /// Tessellate the sphere
    pub fn build(&self) -> SphereMesh {
        let width = self.width_segments.max(Self::MIN_WIDTH_SEGMENTS);
        let height = self.height_segments.max(Self::MIN_HEIGHT_SEGMENTS);
        let radius = self.radius;

        let mut mesh = SphereMesh {
            positions: Vec::with_capacity(self.vertex_count()),
            normals: Vec::with_capacity(self.vertex_count()),
            uvs: Vec::with_capacity(self.vertex_count()),
            tangents: Vec::with_capacity(self.vertex_count()),
            indices: Vec::with_capacity(self.triangle_count() * 3),
        };

        let stride = width + 1;

        for iy in 0..=height {
            let v = iy as f32 / height as f32;
            let theta = v * PI;

            // Pole vertices sit half a segment over so the single pole triangle
            // samples the middle of its texture column
            let u_offset = if iy == 0 {
                0.5 / width as f32
            } else if iy == height {
                -0.5 / width as f32
            } else {
                0.0
            };

            for ix in 0..=width {
                let u = ix as f32 / width as f32;
                let phi = u * 2.0 * PI;

                let x = -radius * phi.cos() * theta.sin();
                let y = radius * theta.cos();
                let z = radius * phi.sin() * theta.sin();
                mesh.positions.push([x, y, z]);

                let normal = glam::Vec3::new(
                    -phi.cos() * theta.sin(),
                    theta.cos(),
                    phi.sin() * theta.sin(),
                );
                let normal = if normal.length_squared() > 0.0 {
                    normal.normalize()
                } else {
                    glam::Vec3::new(0.0, y.signum(), 0.0)
                };
                mesh.normals.push(normal.to_array());

                mesh.uvs.push([u + u_offset, v]);

                // d(position)/d(phi), which stays defined at the poles
                let tangent = glam::Vec3::new(phi.sin(), 0.0, phi.cos());
                mesh.tangents.push([tangent.x, tangent.y, tangent.z, 1.0]);
            }
        }

        for iy in 0..height {
            for ix in 0..width {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;

                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_segment_minimums() {
        let sphere = SphereGeometry::new(1.0, 1, 0);
        assert_eq!(sphere.width_segments, 3);
        assert_eq!(sphere.height_segments, 2);
    }

    #[test]
    fn test_counts_match_build() {
        let sphere = SphereGeometry::new(1.0, 24, 12);
        let mesh = sphere.build();
        assert_eq!(mesh.vertex_count(), 25 * 13);
        assert_eq!(mesh.vertex_count(), sphere.vertex_count());
        assert_eq!(mesh.triangle_count(), sphere.triangle_count());
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert_eq!(mesh.uvs.len(), mesh.vertex_count());
        assert_eq!(mesh.tangents.len(), mesh.vertex_count());
    }

    #[test]
    fn test_vertices_on_radius() {
        let mesh = SphereGeometry::new(2.5, 16, 8).build();
        for p in &mesh.positions {
            let len = Vec3::from_array(*p).length();
            assert!((len - 2.5).abs() < EPSILON, "vertex off the sphere: {}", len);
        }
    }

    #[test]
    fn test_normals_unit_and_outward() {
        let mesh = SphereGeometry::new(3.0, 16, 8).build();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < EPSILON);
            assert!(n.dot(Vec3::from_array(*p)) > 0.0);
        }
    }

    #[test]
    fn test_poles() {
        let mesh = SphereGeometry::new(1.0, 8, 4).build();
        let north = Vec3::from_array(mesh.positions[0]);
        let south = Vec3::from_array(*mesh.positions.last().unwrap());
        assert!((north - Vec3::Y).length() < EPSILON);
        assert!((south + Vec3::Y).length() < EPSILON);
        assert_eq!(mesh.uvs[0][1], 0.0);
        assert_eq!(mesh.uvs.last().unwrap()[1], 1.0);
    }

    #[test]
    fn test_uv_range() {
        let mesh = SphereGeometry::new(1.0, 10, 6).build();
        for uv in &mesh.uvs {
            assert!(uv[0] >= -0.5 / 10.0 - EPSILON && uv[0] <= 1.0 + 0.5 / 10.0 + EPSILON);
            assert!(uv[1] >= 0.0 && uv[1] <= 1.0);
        }
    }

    #[test]
    fn test_indices_in_range() {
        let mesh = SphereGeometry::new(1.0, 12, 6).build();
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_no_degenerate_triangles() {
        let mesh = SphereGeometry::new(1.0, 12, 6).build();
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from_array(mesh.positions[tri[0] as usize]);
            let b = Vec3::from_array(mesh.positions[tri[1] as usize]);
            let c = Vec3::from_array(mesh.positions[tri[2] as usize]);
            let area = (b - a).cross(c - a).length();
            assert!(area > 1e-6, "degenerate triangle {:?}", tri);
        }
    }

    #[test]
    fn test_triangles_face_outward() {
        // Counter-clockwise winding seen from outside
        let mesh = SphereGeometry::new(1.0, 12, 6).build();
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from_array(mesh.positions[tri[0] as usize]);
            let b = Vec3::from_array(mesh.positions[tri[1] as usize]);
            let c = Vec3::from_array(mesh.positions[tri[2] as usize]);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "inward triangle {:?}", tri);
        }
    }

    #[test]
    fn test_tangent_frame_points_north() {
        let mesh = SphereGeometry::new(1.0, 16, 8).build();
        // Equator row
        let stride = 17;
        for ix in 0..16 {
            let i = 4 * stride + ix;
            let n = Vec3::from_array(mesh.normals[i]);
            let t = mesh.tangents[i];
            let t3 = Vec3::new(t[0], t[1], t[2]);
            assert!(n.dot(t3).abs() < EPSILON);
            let bitangent = n.cross(t3) * t[3];
            assert!(bitangent.y > 0.99, "bitangent should point north: {:?}", bitangent);
        }
    }
}
