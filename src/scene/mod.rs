//! Scene construction utilities
//!
//! Scenes come from RON files; the built-in presets stand in when the
//! configured file cannot be read.

mod scene_builder;

pub use scene_builder::{earth_material, star_material, textures, SceneBuilder, EARTH_SEGMENTS, EARTH_SPIN};

use earthview_core::Scene;

use crate::config::SceneConfig;

/// Load the configured scene file, falling back to its preset
pub fn load_scene(config: &SceneConfig) -> Scene {
    if config.path.is_empty() {
        log::info!("No scene file configured; using preset {:?}", config.preset);
        return SceneBuilder::preset(config.preset);
    }

    match Scene::load(&config.path) {
        Ok(scene) => {
            log::info!("Loaded scene '{}' from {}", scene.name, config.path);
            scene
        }
        Err(e) => {
            log::warn!(
                "Failed to load scene {}: {}. Using preset {:?}.",
                config.path,
                e,
                config.preset
            );
            SceneBuilder::preset(config.preset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenePreset;

    #[test]
    fn test_missing_file_uses_preset() {
        let config = SceneConfig {
            path: "does/not/exist.ron".to_string(),
            preset: ScenePreset::EarthSkybox,
        };
        assert_eq!(load_scene(&config), SceneBuilder::earth_skybox());
    }

    #[test]
    fn test_empty_path_uses_preset() {
        let config = SceneConfig {
            path: String::new(),
            preset: ScenePreset::EarthStarfield,
        };
        assert_eq!(load_scene(&config).name, "Earth and stars");
    }
}
