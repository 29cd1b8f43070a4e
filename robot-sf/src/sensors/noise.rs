//! Seeded random sources for sensors and sampling.

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, StandardNormal, Uniform};

/// Small RNG from a seed; seed 0 draws from OS entropy.
pub fn seeded_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}

/// Noise generator with configurable seed for reproducibility
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    rng: SmallRng,
}

impl NoiseGenerator {
    /// Create a new noise generator
    ///
    /// If seed is 0, uses random entropy for non-deterministic behavior.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }

    /// Gaussian noise with given standard deviation
    #[inline]
    pub fn gaussian(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let n: f32 = self.rng.sample(StandardNormal);
        n * stddev
    }

    /// Gaussian noise with bias and standard deviation
    #[inline]
    pub fn biased_gaussian(&mut self, bias: f32, stddev: f32) -> f32 {
        bias + self.gaussian(stddev)
    }

    /// Uniform random in [0, 1)
    #[inline]
    pub fn uniform(&mut self) -> f32 {
        Uniform::new(0.0f32, 1.0).sample(&mut self.rng)
    }

    /// Uniform random in [0, max]
    #[inline]
    pub fn uniform_up_to(&mut self, max: f32) -> f32 {
        Uniform::new_inclusive(0.0f32, max).sample(&mut self.rng)
    }

    /// Returns true with given probability
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        probability > 0.0 && self.uniform() < probability
    }
}
