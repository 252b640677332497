//! Orbit camera controller
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right drag (or Shift + left drag): pan in screen space
//! - Mouse wheel: dolly toward / away from the target
//!
//! Input is accumulated between frames and applied in [`OrbitController::update`].
//! With damping enabled only a fraction of the pending motion is applied each
//! frame, so the camera eases out after the mouse stops.

use earthview_math::spherical::Spherical;
use glam::Vec3;
use std::f32::consts::{PI, TAU};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Reference frame rate the damping factor is tuned for
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Pixel scroll per wheel step when the platform reports pixel deltas
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragMode {
    None,
    Rotate,
    Pan,
}

/// Saved camera placement for [`OrbitController::restore`]
#[derive(Clone, Copy, Debug, PartialEq)]
struct SavedState {
    position: Vec3,
    target: Vec3,
}

/// Orbit controller with damping
pub struct OrbitController {
    // Pointer state
    drag: DragMode,
    shift_held: bool,
    viewport_height: f32,

    // Pending motion
    delta_theta: f32,
    delta_phi: f32,
    pan_pixels: (f32, f32),
    pan_offset: Vec3,
    scale: f32,

    saved: Option<SavedState>,

    // Configuration
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    /// Fraction of pending motion applied per 60 Hz frame
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            drag: DragMode::None,
            shift_held: false,
            viewport_height: 1.0,

            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_pixels: (0.0, 0.0),
            pan_offset: Vec3::ZERO,
            scale: 1.0,

            saved: None,

            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }

    /// Set the viewport height in physical pixels; drag distances are relative to it
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Track the Shift modifier (Shift + left drag pans)
    pub fn set_shift(&mut self, held: bool) {
        self.shift_held = held;
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if state == ElementState::Released {
            self.drag = DragMode::None;
            return;
        }

        self.drag = match button {
            MouseButton::Left if self.shift_held => DragMode::Pan,
            MouseButton::Left => DragMode::Rotate,
            MouseButton::Right => DragMode::Pan,
            _ => self.drag,
        };
    }

    /// Process raw mouse movement in physical pixels
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        let (dx, dy) = (delta_x as f32, delta_y as f32);
        match self.drag {
            DragMode::Rotate if self.enable_rotate => {
                let per_pixel = TAU / self.viewport_height * self.rotate_speed;
                self.rotate_left(dx * per_pixel);
                self.rotate_up(dy * per_pixel);
            }
            DragMode::Pan if self.enable_pan => {
                self.pan_pixels.0 += dx * self.pan_speed;
                self.pan_pixels.1 += dy * self.pan_speed;
            }
            _ => {}
        }
    }

    /// Process a mouse wheel event
    ///
    /// Scrolling up (away from the user) moves the camera closer.
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        if !self.enable_zoom {
            return;
        }
        let steps = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
        };
        if steps != 0.0 {
            self.scale *= self.zoom_scale().powf(steps);
        }
    }

    /// Orbit horizontally by `angle` radians
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Orbit vertically by `angle` radians
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Distance multiplier for one wheel step toward the target
    pub fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Whether any motion is still pending
    pub fn is_moving(&self) -> bool {
        const REST: f32 = 1e-6;
        self.delta_theta.abs() > REST
            || self.delta_phi.abs() > REST
            || self.pan_offset.length_squared() > REST * REST
            || self.pan_pixels != (0.0, 0.0)
            || (self.scale - 1.0).abs() > REST
    }

    /// Apply pending motion to the camera
    ///
    /// Returns true if the camera moved.
    pub fn update<C: CameraControl>(&mut self, camera: &mut C, dt: f32) -> bool {
        let position = camera.position();
        let target = camera.target();
        let offset = position - target;

        self.convert_pan(camera, offset);

        let fraction = if self.enable_damping {
            damping_fraction(self.damping_factor, dt)
        } else {
            1.0
        };

        let mut spherical = Spherical::from_cartesian(offset);
        spherical.theta += self.delta_theta * fraction;
        spherical.phi += self.delta_phi * fraction;
        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let new_target = target + self.pan_offset * fraction;
        let new_position = new_target + spherical.to_cartesian();

        camera.set_target(new_target);
        camera.set_position(new_position);

        if self.enable_damping {
            let remaining = 1.0 - fraction;
            self.delta_theta *= remaining;
            self.delta_phi *= remaining;
            self.pan_offset *= remaining;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        const MOVED: f32 = 1e-10;
        (new_position - position).length_squared() > MOVED
            || (new_target - target).length_squared() > MOVED
    }

    /// Turn accumulated pan pixels into a world-space offset
    fn convert_pan<C: CameraControl>(&mut self, camera: &C, offset: Vec3) {
        let (dx, dy) = self.pan_pixels;
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.pan_pixels = (0.0, 0.0);

        // Half the visible height at the target's depth, in world units
        let target_distance = offset.length() * (camera.fov_y() * 0.5).tan();
        let (right, up) = screen_axes(-offset, camera.up());

        self.pan_offset -= right * (2.0 * dx * target_distance / self.viewport_height);
        self.pan_offset += up * (2.0 * dy * target_distance / self.viewport_height);
    }

    /// Clear all pending motion and drag state
    pub fn reset(&mut self) {
        self.drag = DragMode::None;
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.pan_pixels = (0.0, 0.0);
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    /// Remember the camera's current placement for [`restore`](Self::restore)
    pub fn save_state<C: CameraControl>(&mut self, camera: &C) {
        self.saved = Some(SavedState {
            position: camera.position(),
            target: camera.target(),
        });
    }

    /// Put the camera back where [`save_state`](Self::save_state) found it
    ///
    /// Pending motion is cleared. Returns false if nothing was saved.
    pub fn restore<C: CameraControl>(&mut self, camera: &mut C) -> bool {
        self.reset();
        match self.saved {
            Some(state) => {
                camera.set_target(state.target);
                camera.set_position(state.position);
                true
            }
            None => false,
        }
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool, factor: f32) -> Self {
        self.enable_damping = enabled;
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Builder: set rotate, zoom and pan speeds
    pub fn with_speeds(mut self, rotate: f32, zoom: f32, pan: f32) -> Self {
        self.rotate_speed = rotate;
        self.zoom_speed = zoom;
        self.pan_speed = pan;
        self
    }

    /// Builder: clamp the orbit distance
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }
}

/// Fraction of pending motion to apply over `dt` seconds
///
/// `factor` is tuned for 60 Hz frames; longer frames apply proportionally more.
pub fn damping_fraction(factor: f32, dt: f32) -> f32 {
    let factor = factor.clamp(0.0, 1.0);
    let frames = (dt * DAMPING_REFERENCE_HZ).max(0.0);
    1.0 - (1.0 - factor).powf(frames)
}

/// Camera right and up axes for a view direction
fn screen_axes(forward: Vec3, up: Vec3) -> (Vec3, Vec3) {
    let forward = forward.normalize_or_zero();
    let mut right = forward.cross(up).normalize_or_zero();
    if right == Vec3::ZERO {
        right = Vec3::X;
    }
    (right, right.cross(forward))
}

/// Trait for camera control
/// Allows the controller to drive any camera that exposes an eye and a target
pub trait CameraControl {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    fn up(&self) -> Vec3;
    /// Vertical field of view in radians
    fn fov_y(&self) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    const EPSILON: f32 = 0.0001;

    struct TestCamera {
        position: Vec3,
        target: Vec3,
    }

    impl TestCamera {
        fn new() -> Self {
            Self {
                position: Vec3::new(0.0, 0.0, 6.0),
                target: Vec3::ZERO,
            }
        }

        fn distance(&self) -> f32 {
            (self.position - self.target).length()
        }
    }

    impl CameraControl for TestCamera {
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
            Vec3::Y
        }
        fn fov_y(&self) -> f32 {
            45f32.to_radians()
        }
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < EPSILON
    }

    fn undamped() -> OrbitController {
        let mut c = OrbitController::new().with_damping(false, 0.05);
        c.set_viewport_height(600);
        c
    }

    fn drag(c: &mut OrbitController, button: MouseButton, dx: f64, dy: f64) {
        c.process_mouse_button(button, ElementState::Pressed);
        c.process_mouse_motion(dx, dy);
        c.process_mouse_button(button, ElementState::Released);
    }

    #[test]
    fn test_undamped_rotation_applies_immediately() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        // A quarter of the viewport height is a quarter turn
        drag(&mut c, MouseButton::Left, 150.0, 0.0);
        assert!(c.update(&mut cam, 1.0 / 60.0));
        assert!(vec_approx_eq(cam.position, Vec3::new(-6.0, 0.0, 0.0)), "got {:?}", cam.position);
        assert!(!c.is_moving());
        assert!(!c.update(&mut cam, 1.0 / 60.0));
    }

    #[test]
    fn test_motion_without_drag_is_ignored() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        c.process_mouse_motion(100.0, 100.0);
        assert!(!c.update(&mut cam, 1.0 / 60.0));
        assert!(vec_approx_eq(cam.position, Vec3::new(0.0, 0.0, 6.0)));
    }

    #[test]
    fn test_damping_applies_fraction_then_converges() {
        let mut c = OrbitController::new();
        c.set_viewport_height(600);
        let mut cam = TestCamera::new();
        drag(&mut c, MouseButton::Left, 150.0, 0.0);

        c.update(&mut cam, 1.0 / 60.0);
        let theta = Spherical::from_cartesian(cam.position).theta;
        assert!((theta - (-PI / 2.0 * 0.05)).abs() < EPSILON, "got {}", theta);

        for _ in 0..600 {
            c.update(&mut cam, 1.0 / 60.0);
        }
        assert!(vec_approx_eq(cam.position, Vec3::new(-6.0, 0.0, 0.0)), "got {:?}", cam.position);
    }

    #[test]
    fn test_damping_is_frame_rate_independent() {
        let mut fast = OrbitController::new();
        let mut slow = OrbitController::new();
        fast.set_viewport_height(600);
        slow.set_viewport_height(600);
        let mut cam_fast = TestCamera::new();
        let mut cam_slow = TestCamera::new();
        drag(&mut fast, MouseButton::Left, 100.0, 0.0);
        drag(&mut slow, MouseButton::Left, 100.0, 0.0);

        fast.update(&mut cam_fast, 1.0 / 60.0);
        fast.update(&mut cam_fast, 1.0 / 60.0);
        slow.update(&mut cam_slow, 2.0 / 60.0);
        assert!(vec_approx_eq(cam_fast.position, cam_slow.position));
    }

    #[test]
    fn test_damping_fraction() {
        assert!((damping_fraction(0.05, 1.0 / 60.0) - 0.05).abs() < 1e-5);
        assert_eq!(damping_fraction(0.05, 0.0), 0.0);
        assert!((damping_fraction(1.0, 1.0 / 60.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        // Drag far downward: camera swings over the top but stops short of the pole
        drag(&mut c, MouseButton::Left, 0.0, 5000.0);
        c.update(&mut cam, 1.0 / 60.0);
        let s = Spherical::from_cartesian(cam.position - cam.target);
        assert!(cam.position.is_finite());
        assert!(s.phi < 0.001);
        assert!(cam.position.y > 0.0);
        assert!((cam.distance() - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_scroll_up_dollies_in() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        c.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        c.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 6.0 * 0.95).abs() < EPSILON);

        c.process_scroll(MouseScrollDelta::LineDelta(0.0, -1.0));
        c.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_pixel_scroll() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        c.process_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 50.0)));
        c.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 6.0 * 0.95).abs() < EPSILON);
    }

    #[test]
    fn test_distance_limits() {
        let mut c = undamped().with_distance_limits(2.0, 10.0);
        let mut cam = TestCamera::new();
        for _ in 0..100 {
            c.process_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        }
        c.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 2.0).abs() < EPSILON);

        for _ in 0..100 {
            c.process_scroll(MouseScrollDelta::LineDelta(0.0, -1.0));
        }
        c.update(&mut cam, 1.0 / 60.0);
        assert!((cam.distance() - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_zoom_disabled() {
        let mut c = undamped();
        c.enable_zoom = false;
        let mut cam = TestCamera::new();
        c.process_scroll(MouseScrollDelta::LineDelta(0.0, 3.0));
        assert!(!c.update(&mut cam, 1.0 / 60.0));
    }

    #[test]
    fn test_right_drag_pans() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        drag(&mut c, MouseButton::Right, 100.0, 0.0);
        c.update(&mut cam, 1.0 / 60.0);

        let expected = 2.0 * 100.0 * 6.0 * (22.5f32.to_radians()).tan() / 600.0;
        assert!(vec_approx_eq(cam.target, Vec3::new(-expected, 0.0, 0.0)), "got {:?}", cam.target);
        // Orbit offset is unchanged by panning
        assert!(vec_approx_eq(cam.position - cam.target, Vec3::new(0.0, 0.0, 6.0)));
    }

    #[test]
    fn test_shift_left_drag_pans() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        c.set_shift(true);
        drag(&mut c, MouseButton::Left, 0.0, 100.0);
        c.update(&mut cam, 1.0 / 60.0);
        assert!(cam.target.y > 0.0);
        assert!(cam.target.x.abs() < EPSILON);
    }

    #[test]
    fn test_reset_clears_pending_motion() {
        let mut c = OrbitController::new();
        c.set_viewport_height(600);
        let mut cam = TestCamera::new();
        drag(&mut c, MouseButton::Left, 300.0, 40.0);
        c.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        assert!(c.is_moving());
        c.reset();
        assert!(!c.is_moving());
        assert!(!c.update(&mut cam, 1.0 / 60.0));
    }

    #[test]
    fn test_save_and_restore() {
        let mut c = undamped();
        let mut cam = TestCamera::new();
        assert!(!c.restore(&mut cam));

        c.save_state(&cam);
        drag(&mut c, MouseButton::Left, 200.0, 50.0);
        drag(&mut c, MouseButton::Right, 30.0, 0.0);
        c.update(&mut cam, 1.0 / 60.0);
        assert!(!vec_approx_eq(cam.position, Vec3::new(0.0, 0.0, 6.0)));

        assert!(c.restore(&mut cam));
        assert!(vec_approx_eq(cam.position, Vec3::new(0.0, 0.0, 6.0)));
        assert!(vec_approx_eq(cam.target, Vec3::ZERO));
    }
}
