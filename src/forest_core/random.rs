use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed reals in `[0, 1)`.
pub trait UniformSource {
    fn next(&mut self) -> f32;
}

pub struct SeededSource {
    seed: u64,
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl UniformSource for SeededSource {
    fn next(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}
