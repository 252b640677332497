//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`EV_SECTION__KEY`)

use earthview_input::OrbitController;
use earthview_render::PerspectiveCamera;
use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Orbit controls configuration
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Scene selection
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug panel configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`EV_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // User overrides (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // EV_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("EV_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Earthview".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]; the camera looks at the origin
    pub position: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 6.0],
            fov: 45.0,
            near: 0.1,
            far: 500.0,
        }
    }
}

impl CameraConfig {
    /// Build a camera for a window of the given aspect ratio
    pub fn to_camera(&self, aspect: f32) -> PerspectiveCamera {
        PerspectiveCamera::new(self.fov, aspect, self.near, self.far)
            .with_position(self.position.into())
    }
}

/// Orbit controls configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Ease camera motion out over several frames
    pub enable_damping: bool,
    /// Fraction of pending motion applied per 60 Hz frame
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enable_pan: bool,
    /// Closest orbit distance
    pub min_distance: f32,
    /// Farthest orbit distance
    pub max_distance: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            enable_pan: true,
            min_distance: 0.0,
            max_distance: 400.0,
        }
    }
}

impl ControlsConfig {
    /// Build an orbit controller with these settings
    pub fn to_controller(&self) -> OrbitController {
        let mut controller = OrbitController::new()
            .with_damping(self.enable_damping, self.damping_factor)
            .with_speeds(self.rotate_speed, self.zoom_speed, self.pan_speed)
            .with_distance_limits(self.min_distance, self.max_distance);
        controller.enable_pan = self.enable_pan;
        controller
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Cap on scene pixels per logical pixel
    pub max_pixel_ratio: f64,
    /// Directory texture paths are relative to
    pub asset_dir: String,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            asset_dir: "static/textures".to_string(),
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenePreset {
    /// Earth in a point starfield
    #[default]
    EarthStarfield,
    /// Earth inside a cube map sky with an oscillating sun
    EarthSkybox,
}

/// Scene selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RON scene file; empty to use the preset directly
    pub path: String,
    /// Used when the scene file is missing or invalid
    pub preset: ScenePreset,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "scenes/earth_starfield.ron".to_string(),
            preset: ScenePreset::EarthStarfield,
        }
    }
}

/// Debug panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the panel at startup
    pub show_panel: bool,
    /// Initial Earth rotation speed multiplier
    pub earth_speed: f32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_panel: true,
            earth_speed: 1.0,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.fov, 45.0);
        assert_eq!(config.camera.far, 500.0);
        assert_eq!(config.controls.damping_factor, 0.05);
        assert_eq!(config.rendering.max_pixel_ratio, 2.0);
        assert_eq!(config.debug.earth_speed, 1.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("damping_factor"));
        assert!(toml.contains("earth_starfield"));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: AppConfig = toml::from_str("[camera]\nfov = 60.0\n").unwrap();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 0.1);
        assert_eq!(config.window.title, "Earthview");
    }

    #[test]
    fn test_preset_names() {
        let config: AppConfig = toml::from_str("[scene]\npreset = \"earth_skybox\"\n").unwrap();
        assert_eq!(config.scene.preset, ScenePreset::EarthSkybox);
    }

    #[test]
    fn test_camera_from_config() {
        let camera = CameraConfig::default().to_camera(2.0);
        assert_eq!(camera.position.z, 6.0);
        assert_eq!(camera.aspect, 2.0);
        assert_eq!(camera.target, earthview_core::Vec3::ZERO);
    }

    #[test]
    fn test_controller_from_config() {
        let controls = ControlsConfig {
            enable_damping: false,
            enable_pan: false,
            max_distance: 50.0,
            ..Default::default()
        };
        let controller = controls.to_controller();
        assert!(!controller.enable_damping);
        assert!(!controller.enable_pan);
        assert_eq!(controller.max_distance, 50.0);
    }
}
