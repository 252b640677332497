//! Light types
//!
//! A directional light shines from its position toward the origin. Its
//! position can oscillate along one axis over time.

use earthview_math::Vec3;
use serde::{Deserialize, Serialize};

/// A coordinate axis
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Mutable access to this axis' component of a vector
    pub fn component_mut(self, v: &mut Vec3) -> &mut f32 {
        match self {
            Axis::X => &mut v.x,
            Axis::Y => &mut v.y,
            Axis::Z => &mut v.z,
        }
    }
}

/// Sinusoidal motion of one coordinate: `amplitude * sin(t * frequency + phase)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: Axis,
    pub amplitude: f32,
    /// Angular frequency in radians per second
    #[serde(default = "unit_frequency")]
    pub frequency: f32,
    #[serde(default)]
    pub phase: f32,
}

fn unit_frequency() -> f32 {
    1.0
}

impl Oscillation {
    pub fn new(axis: Axis, amplitude: f32) -> Self {
        Self {
            axis,
            amplitude,
            frequency: 1.0,
            phase: 0.0,
        }
    }

    /// Coordinate value at `elapsed` seconds
    pub fn value_at(&self, elapsed: f32) -> f32 {
        self.amplitude * (elapsed * self.frequency + self.phase).sin()
    }
}

/// A light in the scene
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Light {
    /// Uniform light from every direction
    Ambient { color: [f32; 3], intensity: f32 },
    /// Parallel light shining from `position` toward the origin
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        #[serde(default)]
        oscillation: Option<Oscillation>,
    },
}

impl Light {
    /// White ambient light
    pub fn ambient(intensity: f32) -> Self {
        Light::Ambient {
            color: [1.0, 1.0, 1.0],
            intensity,
        }
    }

    /// White directional light at `position`
    pub fn directional(intensity: f32, position: Vec3) -> Self {
        Light::Directional {
            color: [1.0, 1.0, 1.0],
            intensity,
            position,
            oscillation: None,
        }
    }

    /// Builder: oscillate a directional light's position
    ///
    /// Has no effect on ambient lights.
    pub fn with_oscillation(mut self, osc: Oscillation) -> Self {
        if let Light::Directional { oscillation, .. } = &mut self {
            *oscillation = Some(osc);
        }
        self
    }

    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. } | Light::Directional { intensity, .. } => *intensity,
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        match self {
            Light::Ambient { intensity, .. } | Light::Directional { intensity, .. } => {
                *intensity = value
            }
        }
    }

    /// Color scaled by intensity
    pub fn radiance(&self) -> [f32; 3] {
        let (color, intensity) = match self {
            Light::Ambient { color, intensity } | Light::Directional { color, intensity, .. } => {
                (color, *intensity)
            }
        };
        [color[0] * intensity, color[1] * intensity, color[2] * intensity]
    }

    pub fn is_directional(&self) -> bool {
        matches!(self, Light::Directional { .. })
    }

    /// Unit vector from a lit surface toward the light, for directional lights
    pub fn to_light(&self) -> Option<Vec3> {
        match self {
            Light::Directional { position, .. } => {
                let dir = position.normalize_or_zero();
                if dir == Vec3::ZERO { Some(Vec3::Y) } else { Some(dir) }
            }
            Light::Ambient { .. } => None,
        }
    }

    /// Move an oscillating light to its position at `elapsed` seconds
    pub fn apply_oscillation(&mut self, elapsed: f32) {
        if let Light::Directional { position, oscillation: Some(osc), .. } = self {
            *osc.axis.component_mut(position) = osc.value_at(elapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_oscillation_value() {
        let osc = Oscillation::new(Axis::X, 5.0);
        assert_eq!(osc.value_at(0.0), 0.0);
        assert!((osc.value_at(FRAC_PI_2) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_apply_oscillation_touches_one_axis() {
        let mut light = Light::directional(2.2, Vec3::new(3.0, -1.0, -5.0))
            .with_oscillation(Oscillation::new(Axis::X, 4.0));
        light.apply_oscillation(FRAC_PI_2);
        match light {
            Light::Directional { position, .. } => {
                assert!((position.x - 4.0).abs() < 1e-5);
                assert_eq!(position.y, -1.0);
                assert_eq!(position.z, -5.0);
            }
            _ => panic!("Expected directional light"),
        }
    }

    #[test]
    fn test_ambient_ignores_oscillation() {
        let light = Light::ambient(0.05).with_oscillation(Oscillation::new(Axis::Y, 1.0));
        assert_eq!(light, Light::ambient(0.05));
    }

    #[test]
    fn test_to_light() {
        let light = Light::directional(1.0, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(light.to_light(), Some(-Vec3::Z));
        assert_eq!(Light::ambient(1.0).to_light(), None);
        assert_eq!(Light::directional(1.0, Vec3::ZERO).to_light(), Some(Vec3::Y));
    }

    #[test]
    fn test_radiance() {
        let light = Light::ambient(0.5);
        assert_eq!(light.radiance(), [0.5, 0.5, 0.5]);
    }
}
