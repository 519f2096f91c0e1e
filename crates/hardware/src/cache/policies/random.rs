//! Random Replacement Policy.
//!
//! This policy evicts a uniformly random way from the set, ignoring validity, so
//! it can evict a valid line while an invalid way sits empty. It uses a xorshift64
//! generator rather than a full RNG so runs are reproducible from the seed.

use super::ReplacementPolicy;
use crate::cache::line::CacheLine;

/// Seed used when zero is requested (xorshift never leaves the all-zero state).
const FALLBACK_SEED: u64 = 123_456_789;

/// Random Policy state.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `seed` - Generator seed; zero is replaced by a fixed non-zero seed.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }

    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(FALLBACK_SEED)
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    /// Generates a pseudo-random number and maps it to a way index.
    fn select_victim(&mut self, ways: &[CacheLine]) -> usize {
        if ways.is_empty() {
            return 0;
        }
        (self.next() % ways.len() as u64) as usize
    }
}
