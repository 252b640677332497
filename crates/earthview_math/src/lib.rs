//! Earthview Mathematics Library
//!
//! Geometry and coordinate helpers shared by the Earthview crates.
//! Vector and matrix types come from `glam` and are re-exported here.
//!
//! ## Geometry
//!
//! - [`SphereGeometry`] - Latitude/longitude sphere tessellation
//! - [`SphereMesh`] - Positions, normals, UVs, tangents and indices of a sphere
//!
//! ## Coordinates
//!
//! - [`Spherical`] - Radius / polar / azimuth coordinates around +Y
//! - [`generate_starfield`] - Random star positions in a spherical shell

pub mod projection;
pub mod sphere;
pub mod spherical;
pub mod starfield;

pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4, EulerRot};
pub use projection::{look_at, perspective};
pub use sphere::{SphereGeometry, SphereMesh};
pub use spherical::Spherical;
pub use starfield::{generate_starfield, StarfieldParams};
