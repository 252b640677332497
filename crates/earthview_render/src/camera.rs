//! Perspective camera
//!
//! The camera always looks at its target. Orbit controls move the position
//! and target; the projection follows the window's aspect ratio.

use earthview_input::CameraControl;
use earthview_math::{look_at, perspective, Mat3, Mat4, Vec3};

/// Perspective camera looking at a target point
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(45.0, 1.0, 0.1, 500.0).with_position(Vec3::new(0.0, 0.0, 6.0))
    }
}

impl PerspectiveCamera {
    /// Create a camera at the origin looking down -Z
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Builder: move the camera, keeping it aimed at the origin
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self.target = Vec3::ZERO;
        self
    }

    /// Aim at a point
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Update the aspect ratio after a resize; degenerate sizes are ignored
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Unit vector the camera faces
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        perspective(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Maps clip-space points to world directions, ignoring the camera position
    ///
    /// Used to turn a fullscreen triangle into sky directions.
    pub fn sky_matrix(&self) -> Mat4 {
        let rotation = Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()));
        (self.projection_matrix() * rotation).inverse()
    }
}

impl CameraControl for PerspectiveCamera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn up(&self) -> Vec3 {
        self.up
    }

    fn fov_y(&self) -> f32 {
        self.fov.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthview_math::Vec4;

    const EPSILON: f32 = 0.0001;

    #[test]
    fn test_default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.fov, 45.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 500.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 6.0));
        assert!((cam.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let cam = PerspectiveCamera::default();
        let clip = cam.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < EPSILON && ndc.y.abs() < EPSILON);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_set_aspect_ignores_zero() {
        let mut cam = PerspectiveCamera::default();
        cam.set_aspect(1600, 900);
        assert!((cam.aspect - 16.0 / 9.0).abs() < EPSILON);
        cam.set_aspect(0, 900);
        assert!((cam.aspect - 16.0 / 9.0).abs() < EPSILON);
    }

    #[test]
    fn test_sky_matrix_center_is_forward() {
        let mut cam = PerspectiveCamera::default().with_position(Vec3::new(6.0, 0.0, 0.0));
        cam.set_aspect(800, 600);
        let p = cam.sky_matrix() * Vec4::new(0.0, 0.0, 1.0, 1.0);
        let dir = (p.truncate() / p.w).normalize();
        assert!((dir - Vec3::new(-1.0, 0.0, 0.0)).length() < 0.001, "got {:?}", dir);
    }

    #[test]
    fn test_camera_control_fov_in_radians() {
        let cam = PerspectiveCamera::default();
        assert!((CameraControl::fov_y(&cam) - 45f32.to_radians()).abs() < 1e-6);
    }
}
