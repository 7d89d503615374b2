//! Random number generator abstraction for determinism.
//!
//! Answer shuffling draws from a [`DeterministicRng`] so tests can pin the
//! order of answer choices. Production code uses [`StdGameRng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Uniform in-place Fisher-Yates shuffle driven by `rng`.
///
/// Every permutation is equally likely provided `rng` is uniform.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for upper in (1..items.len()).rev() {
        let bound = u32::try_from(upper).unwrap_or(u32::MAX);
        let pick = rng.next_u32_range(0, bound) as usize;
        items.swap(upper, pick.min(upper));
    }
}

/// Production RNG backed by `rand`'s `StdRng`.
#[derive(Debug)]
pub struct StdGameRng(StdRng);

impl StdGameRng {
    /// Seeds from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeds from a fixed value, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DeterministicRng for StdGameRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.0.random_range(min..=max)
    }
}
