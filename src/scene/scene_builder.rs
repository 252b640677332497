//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for building Earth scenes, and the two built-in
//! presets used when no scene file can be loaded.

use earthview_core::{
    Axis, Background, EntityTemplate, Light, ObjectTemplate, Oscillation, PointsMaterial, Scene,
    SphereGeometry, StandardMaterial, StarfieldParams, TextureFilter, TextureRef, Vec3,
};

use crate::config::ScenePreset;

/// Y rotation of the Earth per 60 Hz frame at speed 1
pub const EARTH_SPIN: f32 = 0.001;

/// Tessellation of the Earth sphere
pub const EARTH_SEGMENTS: u32 = 350;

/// Texture paths of the Earth material, relative to the asset directory
pub mod textures {
    pub const DAY: &str = "2k_earth_daymap.jpg";
    pub const NIGHT: &str = "2k_earth_nightmap.jpg";
    pub const NORMAL: &str = "2k_earth_normal_map.tif";
    pub const SPECULAR: &str = "2k_earth_specular_map.tif";
    pub const STAR: &str = "star.png";
    pub const ENVIRONMENT: &str = "environmentMaps/0";
}

/// The Earth's surface: day albedo, night lights, normal and roughness maps
pub fn earth_material() -> StandardMaterial {
    StandardMaterial {
        map: Some(TextureRef::srgb(textures::DAY).with_filter(TextureFilter::Nearest)),
        normal_map: Some(TextureRef::linear(textures::NORMAL)),
        emissive_map: Some(TextureRef::srgb(textures::NIGHT)),
        emissive: [1.0, 1.0, 1.0],
        emissive_intensity: 0.5,
        roughness_map: Some(TextureRef::linear(textures::SPECULAR)),
        ..Default::default()
    }
}

/// Slightly yellow star sprites that never occlude each other
pub fn star_material() -> PointsMaterial {
    PointsMaterial {
        map: Some(TextureRef::srgb(textures::STAR)),
        color: [1.0, 0.95, 0.7],
        size: 0.3,
        size_attenuation: true,
        transparent: true,
        depth_write: false,
        opacity: 1.0,
    }
}

/// Builder for constructing Earth scenes
///
/// # Example
/// ```ignore
/// let scene = SceneBuilder::new("Earth")
///     .add_earth()
///     .add_starfield(StarfieldParams::default())
///     .add_ambient(0.05)
///     .add_sun(2.2, Vec3::new(3.0, -1.0, -5.0))
///     .build();
/// ```
pub struct SceneBuilder {
    scene: Scene,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scene: Scene::new(name),
        }
    }

    /// Add the spinning, textured Earth at the origin
    pub fn add_earth(mut self) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(ObjectTemplate::Sphere {
                geometry: SphereGeometry::new(1.0, EARTH_SEGMENTS, EARTH_SEGMENTS),
                material: earth_material(),
            })
            .with_name("earth")
            .with_tag("planet")
            .with_spin(EARTH_SPIN),
        );
        self
    }

    /// Add a shell of stars around the origin
    pub fn add_starfield(mut self, params: StarfieldParams) -> Self {
        self.scene.add_entity(
            EntityTemplate::new(ObjectTemplate::Starfield {
                params,
                material: star_material(),
            })
            .with_name("stars"),
        );
        self
    }

    /// Add a white ambient light
    pub fn add_ambient(mut self, intensity: f32) -> Self {
        self.scene.lights.push(Light::ambient(intensity));
        self
    }

    /// Add a white directional light shining from `position`
    pub fn add_sun(mut self, intensity: f32, position: Vec3) -> Self {
        self.scene.lights.push(Light::directional(intensity, position));
        self
    }

    /// Oscillate the most recently added directional light
    pub fn oscillating(mut self, oscillation: Oscillation) -> Self {
        if let Some(light) = self.scene.lights.iter_mut().rev().find(|l| l.is_directional()) {
            *light = light.clone().with_oscillation(oscillation);
        }
        self
    }

    /// Use a cube map directory as the background
    pub fn with_skybox(mut self, dir: &str, extension: &str) -> Self {
        self.scene.background = Background::cube_map_dir(dir, extension);
        self
    }

    /// Set where the camera starts
    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.scene.camera_position = Some(position);
        self
    }

    /// Build the scene
    pub fn build(self) -> Scene {
        self.scene
    }

    /// Earth in a point starfield, lit from behind and to the side
    pub fn earth_starfield() -> Scene {
        Self::new("Earth and stars")
            .add_earth()
            .add_starfield(StarfieldParams::default())
            .add_ambient(0.05)
            .add_sun(2.2, Vec3::new(3.0, -1.0, -5.0))
            .with_camera_position(Vec3::new(0.0, 0.0, 6.0))
            .build()
    }

    /// Earth inside a cube map sky, with the sun sweeping along X
    pub fn earth_skybox() -> Scene {
        Self::new("Earth and sky")
            .add_earth()
            .add_ambient(0.05)
            .add_sun(2.2, Vec3::new(3.0, -1.0, -5.0))
            .oscillating(Oscillation::new(Axis::X, 5.0))
            .with_skybox(textures::ENVIRONMENT, "jpg")
            .with_camera_position(Vec3::new(0.0, 0.0, 6.0))
            .build()
    }

    /// Scene for a preset
    pub fn preset(preset: ScenePreset) -> Scene {
        match preset {
            ScenePreset::EarthStarfield => Self::earth_starfield(),
            ScenePreset::EarthSkybox => Self::earth_skybox(),
        }
    }
}
