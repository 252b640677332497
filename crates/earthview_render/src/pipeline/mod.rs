//! Rendering pipeline components
//!
//! Scene pipelines share bind group 0 ([`GlobalBindings`]) for the camera
//! and lights. The blit pipeline scales a reduced-resolution scene onto the
//! surface.

pub mod blit_pipeline;
pub mod globals;
pub mod mesh_pipeline;
pub mod points_pipeline;
pub mod skybox_pipeline;
pub mod types;

// Re-export types
pub use types::{
    CameraUniforms, DirLight, LightUniforms, MaterialUniforms, MeshVertex, ModelUniforms,
    PointsUniforms, MAX_DIRECTIONAL_LIGHTS,
};

// Re-export pipelines
pub use blit_pipeline::BlitPipeline;
pub use globals::GlobalBindings;
pub use mesh_pipeline::{MaterialTextures, MeshPipeline, DEPTH_FORMAT};
pub use points_pipeline::{PointsPipeline, VERTICES_PER_POINT};
pub use skybox_pipeline::SkyboxPipeline;
