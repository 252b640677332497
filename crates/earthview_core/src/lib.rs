//! Core types for Earthview
//!
//! - [`Transform3D`] - Position, Euler rotation, and scale
//! - [`StandardMaterial`] / [`PointsMaterial`] - Surface and sprite materials
//! - [`Entity`] - A sphere mesh or point cloud with a transform
//! - [`Light`] - Ambient and (optionally oscillating) directional lights
//! - [`World`] - Container for entities, lights and the background
//! - [`Scene`] - Loadable/saveable RON scene description
//! - [`TextureAsset`] / [`AssetCache`] - Decoded images and their cache

mod asset_cache;
mod asset_error;
mod background;
mod entity;
mod light;
mod material;
mod scene;
mod texture;
mod transform;
mod world;

pub use asset_cache::{Asset, AssetCache, AssetHandle, AssetId};
pub use asset_error::AssetError;
pub use background::Background;
pub use entity::{wrap_angle, DirtyFlags, Entity, EntityTemplate, Object, ObjectTemplate};
pub use light::{Axis, Light, Oscillation};
pub use material::{
    ColorSpace, MaterialFlags, PointsMaterial, StandardMaterial, TextureFilter, TextureRef,
};
pub use scene::{Scene, SceneLoadError, SceneSaveError};
pub use texture::TextureAsset;
pub use transform::Transform3D;
pub use world::{EntityKey, World};

// Re-export commonly used math types for convenience
pub use earthview_math::{SphereGeometry, StarfieldParams, Vec3};
