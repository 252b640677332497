//! 3D Transform (position, rotation, scale)
//!
//! Rotation is stored as Euler angles in XYZ order so individual axes can be
//! animated and edited directly (the debug panel drives `rotation.y`).

use earthview_math::{EulerRot, Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A 3D transform with position, Euler rotation, and per-axis scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    /// Position in world space
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z (intrinsic)
    #[serde(default)]
    pub rotation: Vec3,
    /// Scale per axis
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Rotation as a quaternion
    pub fn quaternion(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Model matrix: scale, then rotate, then translate
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quaternion(), self.position)
    }

    /// Matrix for transforming normals (inverse transpose of the upper 3x3)
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.matrix().transform_point3(p)
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Set uniform scale
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 0.0001;

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(vec_approx_eq(t.transform_point(p), p));
    }

    #[test]
    fn test_translation() {
        let t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0));
        assert!(vec_approx_eq(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_y_rotation() {
        let mut t = Transform3D::identity();
        t.rotation.y = FRAC_PI_2;
        // +X rotated a quarter turn about +Y lands on -Z
        let p = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(p, -Vec3::Z), "got {:?}", p);
    }

    #[test]
    fn test_transform_order() {
        let mut t = Transform3D::identity();
        t.set_scale(2.0);
        t.rotation.y = FRAC_PI_2;
        t.position = Vec3::new(10.0, 0.0, 0.0);
        let p = t.transform_point(Vec3::X);
        assert!(vec_approx_eq(p, Vec3::new(10.0, 0.0, -2.0)), "got {:?}", p);
    }

    #[test]
    fn test_normal_matrix_uniform_scale() {
        let mut t = Transform3D::identity();
        t.set_scale(3.0);
        let n = (t.normal_matrix() * Vec3::Y).normalize();
        assert!(vec_approx_eq(n, Vec3::Y));
    }

    #[test]
    fn test_default() {
        let t = Transform3D::default();
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.rotation, Vec3::ZERO);
    }
}
