//! Earthview Rendering Library
//!
//! This crate provides the wgpu-based pipelines that draw an Earthview
//! world: lit spheres, point sprites and a cube map sky.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::PerspectiveCamera`] - Look-at camera driven by orbit controls
//! - [`texture::GpuTexture`] - 2D and cube textures uploaded from assets
//! - [`library::TextureLibrary`] - Resolves texture references with fallbacks
//! - [`renderable::RenderableScene`] - Converts World/Entity to GPU buffers
//! - [`renderer::SceneRenderer`] - Pipelines, depth and pixel ratio handling

pub mod camera;
pub mod context;
pub mod library;
pub mod pipeline;
pub mod renderable;
pub mod renderer;
pub mod target;
pub mod texture;

pub use camera::PerspectiveCamera;
pub use context::{ContextError, RenderContext};
pub use library::{Fallback, TextureLibrary};
pub use renderable::RenderableScene;
pub use renderer::{ScenePipelines, SceneRenderer};
pub use texture::{CubeMapError, GpuTexture};

// Re-export core types for convenience
pub use earthview_core::{Entity, EntityKey, Light, World};
