//! Earthview - a textured Earth under a starfield or skybox
//!
//! The binary wires these modules into a winit event loop; they are exposed
//! as a library so integration tests can reach the configuration and scenes.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
