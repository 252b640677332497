//! Spherical coordinates around the +Y axis
//!
//! `phi` is the polar angle measured from +Y, `theta` the azimuth around +Y
//! measured from +Z toward +X.

use glam::Vec3;

/// Polar angles closer than this to a pole are pushed back by [`Spherical::make_safe`]
pub const POLE_EPSILON: f32 = 0.000001;

/// A point in spherical coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Default for Spherical {
    fn default() -> Self {
        Self {
            radius: 1.0,
            phi: 0.0,
            theta: 0.0,
        }
    }
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Convert a cartesian offset into spherical coordinates
    pub fn from_cartesian(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    /// Convert back to a cartesian offset
    pub fn to_cartesian(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep the polar angle strictly between the poles
    pub fn make_safe(&mut self) -> &mut Self {
        self.phi = self.phi.clamp(POLE_EPSILON, std::f32::consts::PI - POLE_EPSILON);
        self
    }
}
