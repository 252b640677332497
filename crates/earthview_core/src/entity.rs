//! Entity and object types
//!
//! An Entity is something drawn in the world: a lit sphere mesh or a point
//! cloud, placed by a transform. Entities can spin about their Y axis.

use std::collections::HashSet;
use bitflags::bitflags;
use earthview_math::{generate_starfield, SphereGeometry, StarfieldParams};
use serde::{Deserialize, Serialize};
use crate::material::{PointsMaterial, StandardMaterial, TextureRef};
use crate::Transform3D;

bitflags! {
    /// Flags indicating which parts of an entity have changed and need updating
    ///
    /// The renderer only re-uploads per-entity data whose flag is set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE = 0;
        /// Transform (position, rotation, scale) has changed
        const TRANSFORM = 1 << 0;
        /// Geometry has changed
        const MESH = 1 << 1;
        /// Material has changed
        const MATERIAL = 1 << 2;
        /// All flags set - entity needs full rebuild
        const ALL = Self::TRANSFORM.bits() | Self::MESH.bits() | Self::MATERIAL.bits();
    }
}

/// What an entity draws
#[derive(Clone, Debug, PartialEq)]
pub enum Object {
    /// A tessellated sphere with a lit surface material
    Mesh {
        geometry: SphereGeometry,
        material: StandardMaterial,
    },
    /// A cloud of camera-facing sprites
    Points {
        positions: Vec<[f32; 3]>,
        material: PointsMaterial,
    },
}

impl Object {
    /// Textures referenced by this object's material
    pub fn textures(&self) -> Vec<&TextureRef> {
        match self {
            Object::Mesh { material, .. } => material.textures().collect(),
            Object::Points { material, .. } => material.map.iter().collect(),
        }
    }
}

/// An entity in the world
pub struct Entity {
    /// Optional name for this entity (for lookup)
    pub name: Option<String>,
    /// Tags for categorization (e.g., "planet", "background")
    pub tags: HashSet<String>,
    /// The entity's transform in world space
    pub transform: Transform3D,
    /// What the entity draws
    pub object: Object,
    /// Y rotation added per 60 Hz frame, in radians
    pub spin: Option<f32>,
    dirty: DirtyFlags,
}

impl Entity {
    /// Create a new entity drawing the given object
    pub fn new(object: Object) -> Self {
        Self {
            name: None,
            tags: HashSet::new(),
            transform: Transform3D::identity(),
            object,
            spin: None,
            dirty: DirtyFlags::ALL, // New entities are dirty
        }
    }

    /// Set the name of this entity (for lookup)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a tag to this entity
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Set the initial transform
    pub fn with_transform(mut self, transform: Transform3D) -> Self {
        self.transform = transform;
        self
    }

    /// Spin about the Y axis by `rate` radians per 60 Hz frame
    pub fn with_spin(mut self, rate: f32) -> Self {
        self.spin = Some(rate);
        self
    }

    /// Check if this entity has a specific tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    // --- Dirty tracking methods ---

    #[inline]
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    #[inline]
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty |= flags;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    /// Set the transform and mark it as dirty
    pub fn set_transform(&mut self, transform: Transform3D) {
        self.transform = transform;
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }

    /// Set the Y rotation (wrapped into `[0, 2π)`) and mark the transform dirty
    pub fn set_rotation_y(&mut self, angle: f32) {
        self.transform.rotation.y = wrap_angle(angle);
        self.mark_dirty(DirtyFlags::TRANSFORM);
    }
}

/// Wrap an angle into `[0, 2π)`
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU { 0.0 } else { wrapped }
}

/// Serializable description of an entity's object
///
/// Starfields store their sampling parameters rather than positions so scene
/// files stay small.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectTemplate {
    Sphere {
        #[serde(default)]
        geometry: SphereGeometry,
        #[serde(default)]
        material: StandardMaterial,
    },
    Starfield {
        #[serde(default)]
        params: StarfieldParams,
        #[serde(default)]
        material: PointsMaterial,
    },
}

impl ObjectTemplate {
    /// Build the runtime object, sampling starfield positions
    pub fn to_object(&self) -> Object {
        match self {
            ObjectTemplate::Sphere { geometry, material } => Object::Mesh {
                geometry: SphereGeometry::new(
                    geometry.radius,
                    geometry.width_segments,
                    geometry.height_segments,
                ),
                material: material.clone(),
            },
            ObjectTemplate::Starfield { params, material } => Object::Points {
                positions: generate_starfield(params),
                material: material.clone(),
            },
        }
    }

    /// Textures referenced by this template's material
    pub fn textures(&self) -> Vec<&TextureRef> {
        match self {
            ObjectTemplate::Sphere { material, .. } => material.textures().collect(),
            ObjectTemplate::Starfield { material, .. } => material.map.iter().collect(),
        }
    }
}

/// A serializable entity template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub transform: Transform3D,
    pub object: ObjectTemplate,
    /// Y rotation per 60 Hz frame
    #[serde(default)]
    pub spin: Option<f32>,
}

impl EntityTemplate {
    /// Create a new entity template at the origin
    pub fn new(object: ObjectTemplate) -> Self {
        Self {
            name: None,
            tags: Vec::new(),
            transform: Transform3D::identity(),
            object,
            spin: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_spin(mut self, rate: f32) -> Self {
        self.spin = Some(rate);
        self
    }

    /// Convert this template to an Entity
    pub fn to_entity(&self) -> Entity {
        let mut entity = Entity::new(self.object.to_object()).with_transform(self.transform);
        if let Some(ref name) = self.name {
            entity = entity.with_name(name.clone());
        }
        for tag in &self.tags {
            entity = entity.with_tag(tag.clone());
        }
        entity.spin = self.spin;
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn sphere_template() -> ObjectTemplate {
        ObjectTemplate::Sphere {
            geometry: SphereGeometry::new(1.0, 350, 350),
            material: StandardMaterial {
                map: Some(TextureRef::srgb("earth/day.jpg")),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_new_entity_is_dirty() {
        let e = Entity::new(sphere_template().to_object());
        assert!(e.is_dirty());
        assert_eq!(e.dirty_flags(), DirtyFlags::ALL);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut e = Entity::new(sphere_template().to_object());
        e.clear_dirty();
        assert!(!e.is_dirty());

        e.set_rotation_y(1.0);
        assert_eq!(e.dirty_flags(), DirtyFlags::TRANSFORM);
        assert_eq!(e.transform.rotation.y, 1.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        let tiny = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_builders() {
        let e = Entity::new(sphere_template().to_object())
            .with_name("earth")
            .with_tag("planet")
            .with_spin(0.001);
        assert_eq!(e.name.as_deref(), Some("earth"));
        assert!(e.has_tag("planet"));
        assert!(!e.has_tag("background"));
        assert_eq!(e.spin, Some(0.001));
    }

    #[test]
    fn test_template_to_entity() {
        let template = EntityTemplate::new(sphere_template())
            .with_name("earth")
            .with_tag("planet")
            .with_spin(0.001);
        let e = template.to_entity();
        assert_eq!(e.name.as_deref(), Some("earth"));
        assert!(e.has_tag("planet"));
        assert_eq!(e.spin, Some(0.001));
        match e.object {
            Object::Mesh { geometry, .. } => {
                assert_eq!(geometry.width_segments, 350);
            }
            _ => panic!("Expected mesh object"),
        }
    }

    #[test]
    fn test_starfield_template_samples_positions() {
        let template = ObjectTemplate::Starfield {
            params: StarfieldParams { count: 42, ..Default::default() },
            material: PointsMaterial::default(),
        };
        match template.to_object() {
            Object::Points { positions, .. } => assert_eq!(positions.len(), 42),
            _ => panic!("Expected points object"),
        }
    }

    #[test]
    fn test_template_clamps_segments() {
        let template = ObjectTemplate::Sphere {
            geometry: SphereGeometry { radius: 1.0, width_segments: 0, height_segments: 0 },
            material: StandardMaterial::default(),
        };
        match template.to_object() {
            Object::Mesh { geometry, .. } => {
                assert_eq!(geometry.width_segments, SphereGeometry::MIN_WIDTH_SEGMENTS);
                assert_eq!(geometry.height_segments, SphereGeometry::MIN_HEIGHT_SEGMENTS);
            }
            _ => panic!("Expected mesh object"),
        }
    }

    #[test]
    fn test_object_textures() {
        let obj = sphere_template().to_object();
        assert_eq!(obj.textures().len(), 1);
        let stars = Object::Points {
            positions: vec![],
            material: PointsMaterial {
                map: Some(TextureRef::srgb("stars/star.png")),
                ..Default::default()
            },
        };
        assert_eq!(stars.textures()[0].path, "stars/star.png");
    }
}
