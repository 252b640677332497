//! Per-frame simulation
//!
//! Keeps the frame clock and advances the world each frame:
//! - Earth spin scaled by the debug speed and frame time
//! - Light oscillation from elapsed time
//! - Debug panel edits pushed into the world, world state pulled back

use std::time::{Duration, Instant};

use earthview_core::{wrap_angle, World};
use earthview_input::CameraControl;

use super::debug_ui::{DebugSettings, PanelEdits};

/// Longest frame the simulation will step over
pub const MAX_FRAME_DT: f32 = 0.25;

/// Frame rate spin rates are expressed at
pub const SPIN_REFERENCE_HZ: f32 = 60.0;

/// Entity the debug panel's rotation slider controls
pub const EARTH_NAME: &str = "earth";

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Timing for one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame, capped at [`MAX_FRAME_DT`]
    pub dt: f32,
    /// Seconds since the simulation started
    pub elapsed: f32,
}

/// Manages the frame clock and world updates
pub struct SimulationSystem {
    start: Instant,
    last_frame: Instant,
    frames_since_report: u32,
    last_report: Instant,
}

impl SimulationSystem {
    /// Create a new simulation system
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            frames_since_report: 0,
            last_report: now,
        }
    }

    /// Start a new frame
    pub fn advance(&mut self) -> FrameTime {
        let now = Instant::now();
        // Cap dt so a stall (first frame, window drag) does not jump the scene
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;
        self.frames_since_report += 1;

        FrameTime {
            dt,
            elapsed: (now - self.start).as_secs_f32(),
        }
    }

    /// Average frame rate over the last second, reported once per second
    pub fn take_fps_report(&mut self) -> Option<f32> {
        let since = self.last_report.elapsed();
        if since < FPS_REPORT_INTERVAL {
            return None;
        }
        let fps = self.frames_since_report as f32 / since.as_secs_f32();
        self.frames_since_report = 0;
        self.last_report = Instant::now();
        Some(fps)
    }

    /// Apply slider changes to the world and camera
    pub fn apply_edits<C: CameraControl>(
        world: &mut World,
        camera: &mut C,
        settings: &DebugSettings,
        edits: PanelEdits,
    ) {
        if edits.camera_z {
            let mut position = camera.position();
            position.z = settings.camera_z;
            camera.set_position(position);
        }
        if edits.earth_rotation {
            if let Some(earth) = world.get_by_name_mut(EARTH_NAME) {
                earth.set_rotation_y(settings.earth_rotation);
            }
        }
        if edits.light_intensity {
            if let Some(light) = world.primary_directional_mut() {
                light.set_intensity(settings.light_intensity);
            }
        }
    }

    /// Advance spinning entities and oscillating lights
    pub fn tick(world: &mut World, settings: &DebugSettings, frame: FrameTime) {
        world.spin_entities(spin_scale(settings.earth_speed, frame.dt));
        world.apply_oscillations(frame.elapsed);
    }

    /// Copy world and camera state back into the panel
    pub fn sync_settings<C: CameraControl>(world: &World, camera: &C, settings: &mut DebugSettings) {
        settings.camera_z = camera.position().z;
        if let Some((_, earth)) = world.get_by_name(EARTH_NAME) {
            settings.earth_rotation = wrap_angle(earth.transform.rotation.y);
        }
        if let Some(light) = world.primary_directional() {
            settings.light_intensity = light.intensity();
        }
        settings.clamp();
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Spin multiplier for a frame: `speed` per 60 Hz frame
pub fn spin_scale(speed: f32, dt: f32) -> f32 {
    speed * dt * SPIN_REFERENCE_HZ
}

#[cfg(test)]
mod tests {
    use super::*;
    use earthview_core::{Entity, Light, Object, SphereGeometry, StandardMaterial, Vec3};
    use std::f32::consts::TAU;

    struct TestCamera {
        position: Vec3,
    }

    impl CameraControl for TestCamera {
        fn position(&self) -> Vec3 {
            self.position
        }
        fn set_position(&mut self, position: Vec3) {
            self.position = position;
        }
        fn target(&self) -> Vec3 {
            Vec3::ZERO
        }
        fn set_target(&mut self, _target: Vec3) {}
        fn up(&self) -> Vec3 {
            Vec3::Y
        }
        fn fov_y(&self) -> f32 {
            45f32.to_radians()
        }
    }

    fn earth_world(spin: f32) -> World {
        let mut world = World::new();
        world.add_entity(
            Entity::new(Object::Mesh {
                geometry: SphereGeometry::default(),
                material: StandardMaterial::default(),
            })
            .with_name(EARTH_NAME)
            .with_spin(spin),
        );
        world.add_light(Light::ambient(0.05));
        world.add_light(Light::directional(2.2, Vec3::new(3.0, -1.0, -5.0)));
        world
    }

    fn earth_rotation(world: &World) -> f32 {
        world.get_by_name(EARTH_NAME).unwrap().1.transform.rotation.y
    }

    #[test]
    fn test_spin_per_reference_frame() {
        let mut world = earth_world(0.001);
        let settings = DebugSettings::default();
        let frame = FrameTime { dt: 1.0 / 60.0, elapsed: 0.0 };

        SimulationSystem::tick(&mut world, &settings, frame);
        assert!((earth_rotation(&world) - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_spin_scales_with_speed_and_time() {
        let mut world = earth_world(0.001);
        let settings = DebugSettings {
            earth_speed: 50.0,
            ..Default::default()
        };
        // Two reference frames worth of time
        let frame = FrameTime { dt: 2.0 / 60.0, elapsed: 0.0 };

        SimulationSystem::tick(&mut world, &settings, frame);
        assert!((earth_rotation(&world) - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_spin_wraps() {
        let mut world = earth_world(1.0);
        world.get_by_name_mut(EARTH_NAME).unwrap().set_rotation_y(TAU - 0.5);
        let frame = FrameTime { dt: 1.0 / 60.0, elapsed: 0.0 };

        SimulationSystem::tick(&mut world, &DebugSettings::default(), frame);
        let r = earth_rotation(&world);
        assert!((0.0..TAU).contains(&r));
        assert!((r - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_tick_moves_oscillating_light() {
        let mut world = World::new();
        world.add_light(
            Light::directional(1.0, Vec3::new(0.0, 0.0, 1.0))
                .with_oscillation(earthview_core::Oscillation::new(earthview_core::Axis::X, 5.0)),
        );
        let frame = FrameTime { dt: 0.0, elapsed: std::f32::consts::FRAC_PI_2 };

        SimulationSystem::tick(&mut world, &DebugSettings::default(), frame);
        match world.primary_directional().unwrap() {
            Light::Directional { position, .. } => assert!((position.x - 5.0).abs() < 1e-4),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_apply_edits() {
        let mut world = earth_world(0.001);
        let mut camera = TestCamera { position: Vec3::new(1.0, 0.0, 6.0) };
        let settings = DebugSettings {
            camera_z: 3.0,
            earth_rotation: 1.5,
            earth_speed: 1.0,
            light_intensity: 7.0,
        };
        let edits = PanelEdits {
            camera_z: true,
            earth_rotation: true,
            light_intensity: true,
        };

        SimulationSystem::apply_edits(&mut world, &mut camera, &settings, edits);
        assert_eq!(camera.position, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(earth_rotation(&world), 1.5);
        assert_eq!(world.primary_directional().unwrap().intensity(), 7.0);
    }

    #[test]
    fn test_unedited_values_left_alone() {
        let mut world = earth_world(0.001);
        let mut camera = TestCamera { position: Vec3::new(0.0, 0.0, 6.0) };
        let settings = DebugSettings {
            camera_z: 2.0,
            light_intensity: 0.0,
            ..Default::default()
        };

        SimulationSystem::apply_edits(&mut world, &mut camera, &settings, PanelEdits::default());
        assert_eq!(camera.position.z, 6.0);
        assert_eq!(world.primary_directional().unwrap().intensity(), 2.2);
    }

    #[test]
    fn test_sync_settings_from_world() {
        let mut world = earth_world(0.001);
        world.get_by_name_mut(EARTH_NAME).unwrap().set_rotation_y(2.0);
        let camera = TestCamera { position: Vec3::new(0.0, 0.0, 40.0) };
        let mut settings = DebugSettings::default();

        SimulationSystem::sync_settings(&world, &camera, &mut settings);
        assert_eq!(settings.earth_rotation, 2.0);
        assert_eq!(settings.light_intensity, 2.2);
        // Zoomed past the slider range
        assert_eq!(settings.camera_z, 10.0);
    }

    #[test]
    fn test_delta_time_capped() {
        let mut sim = SimulationSystem::new();
        sim.last_frame -= Duration::from_secs(2);
        let frame = sim.advance();
        assert_eq!(frame.dt, MAX_FRAME_DT);
        assert!(frame.elapsed >= 0.0);
    }

    #[test]
    fn test_spin_scale() {
        assert!((spin_scale(1.0, 1.0 / 60.0) - 1.0).abs() < 1e-6);
        assert_eq!(spin_scale(10.0, 0.0), 0.0);
    }
}
