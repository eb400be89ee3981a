use rand::Rng;
use rand::rngs::StdRng;

/// Source of the random offsets used when drawing addresses.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `[0, max)`. `max` is never zero.
    fn below(&mut self, max: u32) -> u32;
}

/// Thread-local generator seeded from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    fn below(&mut self, max: u32) -> u32 {
        rand::random_range(0..max)
    }
}

/// Seeded generators give reproducible allocations.
impl RandomSource for StdRng {
    fn below(&mut self, max: u32) -> u32 {
        self.random_range(0..max)
    }
}
