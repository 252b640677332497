//! View and projection helpers
//!
//! Right-handed, camera looking down -Z, clip-space depth in `0..1` as wgpu expects.

use glam::{Mat4, Vec3};

/// Perspective projection matrix
///
/// `fov_y` is the vertical field of view in radians. A non-positive aspect
/// ratio is treated as a square viewport.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let aspect = if aspect > 0.0 { aspect } else { 1.0 };
    Mat4::perspective_rh(fov_y, aspect, near, far)
}

/// View matrix for a camera at `eye` looking at `target`
///
/// When the view direction is parallel to `up`, a fallback up axis is used
/// so the matrix stays finite.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let dir = (target - eye).normalize_or_zero();
    let up = if dir.cross(up).length_squared() < 1e-12 {
        if up.z.abs() < 0.9 { Vec3::Z } else { Vec3::X }
    } else {
        up
    };
    Mat4::look_at_rh(eye, target, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn test_perspective_depth_range() {
        let proj = perspective(45f32.to_radians(), 16.0 / 9.0, 0.1, 500.0);
        let near = proj * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * Vec4::new(0.0, 0.0, -500.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_perspective_bad_aspect() {
        let proj = perspective(1.0, 0.0, 0.1, 10.0);
        assert!(proj.is_finite());
    }

    #[test]
    fn test_look_at_origin() {
        let view = look_at(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y);
        let origin = view.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-4);
    }

    #[test]
    fn test_look_at_straight_down() {
        let view = look_at(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, Vec3::Y);
        assert!(view.is_finite());
    }
}
