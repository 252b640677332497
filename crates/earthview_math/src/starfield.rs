//! Starfield sampling
//!
//! Stars are scattered in a spherical shell around the origin, far outside
//! the planet. Radius, azimuth and polar angle are each drawn uniformly, so
//! the shell is denser toward the poles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Parameters for a starfield shell
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldParams {
    /// Number of stars
    pub count: u32,
    /// Outer radius of the shell
    pub distance: f32,
    /// Inner radius as a fraction of `distance`
    pub inner_ratio: f32,
    /// Seed for the random generator
    pub seed: u64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            count: 5000,
            distance: 100.0,
            inner_ratio: 0.8,
            seed: 0x5eed,
        }
    }
}

impl StarfieldParams {
    /// Inner radius of the shell
    pub fn inner_radius(&self) -> f32 {
        self.distance * self.inner_ratio.clamp(0.0, 1.0)
    }
}

/// Generate star positions for the given parameters
///
/// The same parameters always produce the same positions.
pub fn generate_starfield(params: &StarfieldParams) -> Vec<[f32; 3]> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let inner = params.inner_radius();
    let outer = params.distance;

    (0..params.count)
        .map(|_| {
            let radius = rand_float(&mut rng, inner, outer);
            let theta = rand_float(&mut rng, 0.0, PI * 2.0);
            let phi = rand_float(&mut rng, 0.0, PI);

            [
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            ]
        })
        .collect()
}

/// Uniform float in `[low, high)`, or `low` when the range is empty
fn rand_float(rng: &mut StdRng, low: f32, high: f32) -> f32 {
    low + rng.gen::<f32>() * (high - low)
}
