use rand::prelude::*;
use rand::rngs::SmallRng;

/// Source of the uniform samples that decide cell transitions.
pub trait RandomSource {
    /// A sample in [0, 1).
    fn next_uniform(&mut self) -> f64;
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Seed for a derived, independent generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for Random {
    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
