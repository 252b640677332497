//! World container for entities and lights
//!
//! The World owns everything that is drawn or lights the scene. Entities
//! live in a generational slot map so keys held by the renderer stay valid
//! or fail cleanly after removal.

use std::collections::HashMap;
use slotmap::{new_key_type, SlotMap};
use crate::background::Background;
use crate::entity::{wrap_angle, DirtyFlags, Entity};
use crate::light::Light;

new_key_type! {
    /// Generational key to an entity in the world
    pub struct EntityKey;
}

/// The scene contents: entities, lights and background
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    name_index: HashMap<String, EntityKey>,
    lights: Vec<Light>,
    background: Background,
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the world, returning its key
    ///
    /// A named entity replaces any earlier entity of the same name in the
    /// name index.
    pub fn add_entity(&mut self, entity: Entity) -> EntityKey {
        let name = entity.name.clone();
        let key = self.entities.insert(entity);
        if let Some(name) = name {
            self.name_index.insert(name, key);
        }
        key
    }

    /// Remove an entity, returning it if the key was live
    pub fn remove_entity(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;
        if let Some(ref name) = entity.name {
            if self.name_index.get(name) == Some(&key) {
                self.name_index.remove(name);
            }
        }
        Some(entity)
    }

    pub fn get_entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    pub fn get_entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        self.entities.get_mut(key)
    }

    /// Look up an entity by name
    pub fn get_by_name(&self, name: &str) -> Option<(EntityKey, &Entity)> {
        let key = *self.name_index.get(name)?;
        self.entities.get(key).map(|e| (key, e))
    }

    /// Look up an entity by name, mutably
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Entity> {
        let key = *self.name_index.get(name)?;
        self.entities.get_mut(key)
    }

    /// All entities carrying a tag
    pub fn get_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = (EntityKey, &'a Entity)> + 'a {
        self.entities.iter().filter(move |(_, e)| e.has_tag(tag))
    }

    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over keys and entities
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities.iter()
    }

    /// Iterate over keys and entities mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityKey, &mut Entity)> {
        self.entities.iter_mut()
    }

    // --- Lights and background ---

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    /// The first directional light, which the debug panel drives
    pub fn primary_directional_mut(&mut self) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.is_directional())
    }

    /// The first directional light
    pub fn primary_directional(&self) -> Option<&Light> {
        self.lights.iter().find(|l| l.is_directional())
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    // --- Per-frame updates ---

    /// Advance each spinning entity's Y rotation by `spin * amount_scale`
    ///
    /// Rotation is wrapped into `[0, 2π)` and the transform marked dirty.
    pub fn spin_entities(&mut self, amount_scale: f32) {
        for (_, entity) in self.entities.iter_mut() {
            if let Some(rate) = entity.spin {
                let angle = wrap_angle(entity.transform.rotation.y + rate * amount_scale);
                entity.transform.rotation.y = angle;
                entity.mark_dirty(DirtyFlags::TRANSFORM);
            }
        }
    }

    /// Move oscillating lights to their positions at `elapsed` seconds
    pub fn apply_oscillations(&mut self, elapsed: f32) {
        for light in &mut self.lights {
            light.apply_oscillation(elapsed);
        }
    }

    // --- Dirty tracking ---

    /// Check if any entity has pending changes
    pub fn has_dirty_entities(&self) -> bool {
        self.entities.values().any(|e| e.is_dirty())
    }

    /// Keys of entities with pending changes
    pub fn dirty_entities(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.entities
            .iter()
            .filter(|(_, e)| e.is_dirty())
            .map(|(k, _)| k)
    }

    pub fn clear_all_dirty(&mut self) {
        for entity in self.entities.values_mut() {
            entity.clear_dirty();
        }
    }

    /// Remove all entities and lights
    pub fn clear(&mut self) {
        self.entities.clear();
        self.name_index.clear();
        self.lights.clear();
    }
}
