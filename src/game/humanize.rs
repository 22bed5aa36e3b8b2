//! Aim and power error applied to AI shots

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::profile::ErrorMagnitude;
use super::Shot;

pub const MIN_AI_POWER: f32 = 0.1;
pub const MAX_AI_POWER: f32 = 1.0;

/// Randomized deviation so AI shots look human
#[derive(Debug, Clone)]
pub struct ErrorInjector {
    rng: ChaCha8Rng,
}

impl ErrorInjector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Perturb a shot. The angle is left unnormalized; power is clamped to
    /// `[MIN_AI_POWER, MAX_AI_POWER]`.
    pub fn add_error(&mut self, shot: Shot, magnitude: &ErrorMagnitude) -> Shot {
        // Mean of three draws biases the error toward small deviations
        let spread = (self.rng.gen::<f32>() + self.rng.gen::<f32>() + self.rng.gen::<f32>()) / 3.0;
        let sign = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let angle_error = sign * spread * magnitude.angle_degrees.to_radians();

        let power_error = self.rng.gen_range(-1.0_f32..1.0) * magnitude.power_fraction;

        Shot {
            angle: shot.angle + angle_error,
            power: (shot.power + power_error).clamp(MIN_AI_POWER, MAX_AI_POWER),
        }
    }
}
