//! Earthview Input Handling
//!
//! Orbit-style camera control: drag to orbit, right-drag to pan, wheel to
//! dolly, with optional damping.

mod orbit_controller;

pub use orbit_controller::{damping_fraction, CameraControl, OrbitController};
