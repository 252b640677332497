//! Scene serialization
//!
//! A Scene is the RON description of a world: entity templates, lights,
//! background and an optional camera start position.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use earthview_math::Vec3;
use crate::background::Background;
use crate::entity::EntityTemplate;
use crate::light::Light;
use crate::material::TextureRef;
use crate::World;

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name (for display/debugging)
    pub name: String,
    #[serde(default)]
    pub entities: Vec<EntityTemplate>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default)]
    pub background: Background,
    /// Camera start position; the application default applies when absent
    #[serde(default)]
    pub camera_position: Option<Vec3>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            lights: Vec::new(),
            background: Background::default(),
            camera_position: None,
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        let scene = ron::from_str(&contents)?;
        Ok(scene)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn add_entity(&mut self, entity: EntityTemplate) {
        self.entities.push(entity);
    }

    pub fn with_entity(mut self, entity: EntityTemplate) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_camera_position(mut self, position: Vec3) -> Self {
        self.camera_position = Some(position);
        self
    }

    /// Every texture the scene references, without duplicates, in first-use order
    pub fn textures(&self) -> Vec<TextureRef> {
        let mut out: Vec<TextureRef> = Vec::new();
        let entity_textures = self.entities.iter().flat_map(|e| e.object.textures());
        let background_textures = self.background.faces().into_iter().flatten();
        for tex in entity_textures.chain(background_textures) {
            if !out.contains(tex) {
                out.push(tex.clone());
            }
        }
        out
    }

    /// Build a runtime world from this scene
    pub fn instantiate(&self) -> World {
        let mut world = World::new();
        for template in &self.entities {
            world.add_entity(template.to_entity());
        }
        for light in &self.lights {
            world.add_light(light.clone());
        }
        world.set_background(self.background.clone());
        log::info!(
            "Instantiated scene '{}': {} entities, {} lights",
            self.name,
            world.entity_count(),
            world.lights().len()
        );
        world
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Object, ObjectTemplate};
    use crate::light::{Axis, Oscillation};
    use crate::material::{PointsMaterial, StandardMaterial};
    use earthview_math::{SphereGeometry, StarfieldParams};

    fn earth_template() -> EntityTemplate {
        EntityTemplate::new(ObjectTemplate::Sphere {
            geometry: SphereGeometry::new(1.0, 64, 64),
            material: StandardMaterial {
                map: Some(TextureRef::srgb("earth/day.jpg")),
                emissive_map: Some(TextureRef::srgb("earth/night.jpg")),
                ..Default::default()
            },
        })
        .with_name("earth")
        .with_spin(0.001)
    }

    #[test]
    fn test_scene_new() {
        let scene = Scene::new("Empty");
        assert_eq!(scene.name, "Empty");
        assert!(scene.entities.is_empty());
        assert!(scene.camera_position.is_none());
    }

    #[test]
    fn test_scene_serialization() {
        let scene = Scene::new("Test Scene")
            .with_entity(earth_template())
            .with_light(Light::ambient(0.05))
            .with_light(
                Light::directional(2.2, Vec3::new(3.0, -1.0, -5.0))
                    .with_oscillation(Oscillation::new(Axis::X, 5.0)),
            )
            .with_camera_position(Vec3::new(0.0, 0.0, 6.0));

        let pretty = ron::ser::PrettyConfig::new().struct_names(true);
        let serialized = ron::ser::to_string_pretty(&scene, pretty).unwrap();
        assert!(serialized.contains("Test Scene"));
        assert!(serialized.contains("earth/day.jpg"));
        assert!(serialized.contains("Directional"));

        let deserialized: Scene = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, scene);
    }

    #[test]
    fn test_parse_scene_file_format() {
        let scene_ron = r#"
Scene(
    name: "Earth",
    entities: [
        EntityTemplate(
            name: Some("earth"),
            object: Sphere(
                geometry: SphereGeometry(radius: 1.0, width_segments: 350, height_segments: 350),
                material: StandardMaterial(
                    map: Some(TextureRef(path: "earth/day.jpg", filter: Nearest)),
                    emissive: (1.0, 1.0, 1.0),
                    emissive_intensity: 0.5,
                ),
            ),
            spin: Some(0.001),
        ),
        EntityTemplate(
            name: Some("stars"),
            tags: ["background"],
            object: Starfield(
                params: StarfieldParams(count: 10),
                material: PointsMaterial(size: 0.3, transparent: true, depth_write: false),
            ),
        ),
    ],
    lights: [
        Ambient(color: (1.0, 1.0, 1.0), intensity: 0.05),
        Directional(
            color: (1.0, 1.0, 1.0),
            intensity: 2.2,
            position: (3.0, -1.0, -5.0),
        ),
    ],
    camera_position: Some((0.0, 0.0, 6.0)),
)
"#;
        let scene: Scene = ron::from_str(scene_ron).unwrap();
        assert_eq!(scene.entities.len(), 2);
        assert_eq!(scene.lights.len(), 2);
        assert_eq!(scene.background, Background::default());
        assert_eq!(scene.camera_position, Some(Vec3::new(0.0, 0.0, 6.0)));

        match &scene.entities[0].object {
            ObjectTemplate::Sphere { geometry, material } => {
                assert_eq!(geometry.width_segments, 350);
                assert_eq!(material.emissive_intensity, 0.5);
                assert_eq!(material.roughness, 1.0);
            }
            _ => panic!("Expected sphere"),
        }
        match &scene.entities[1].object {
            ObjectTemplate::Starfield { params, material } => {
                assert_eq!(params.count, 10);
                assert_eq!(params.distance, StarfieldParams::default().distance);
                assert!(!material.depth_write);
            }
            _ => panic!("Expected starfield"),
        }
    }

    #[test]
    fn test_instantiate() {
        let scene = Scene::new("Test")
            .with_entity(earth_template())
            .with_entity(
                EntityTemplate::new(ObjectTemplate::Starfield {
                    params: StarfieldParams { count: 100, ..Default::default() },
                    material: PointsMaterial::default(),
                })
                .with_name("stars"),
            )
            .with_light(Light::ambient(0.05));

        let world = scene.instantiate();
        assert_eq!(world.entity_count(), 2);
        assert_eq!(world.lights().len(), 1);
        let (_, earth) = world.get_by_name("earth").unwrap();
        assert_eq!(earth.spin, Some(0.001));
        let (_, stars) = world.get_by_name("stars").unwrap();
        match &stars.object {
            Object::Points { positions, .. } => assert_eq!(positions.len(), 100),
            _ => panic!("Expected points"),
        }
    }

    #[test]
    fn test_textures_deduplicated() {
        let scene = Scene::new("Test")
            .with_entity(earth_template())
            .with_entity(earth_template())
            .with_background(Background::cube_map_dir("env", "jpg"));
        let textures = scene.textures();
        assert_eq!(textures.len(), 2 + 6);
        assert_eq!(textures[0].path, "earth/day.jpg");
    }

    #[test]
    fn test_load_missing_file() {
        match Scene::load("/no/such/scene.ron") {
            Err(SceneLoadError::Io(_)) => {}
            other => panic!("Expected IO error, got {:?}", other.map(|s| s.name)),
        }
    }
}
