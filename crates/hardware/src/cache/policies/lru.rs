//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the line that has not been touched for the longest time.
//! Invalid ways are always taken first. Among valid ways the one with the smallest
//! `replace_state` stamp is the victim; ties go to the lowest way index.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()` is O(W) where W is the associativity
//! - **Space Complexity:** O(1); recency lives in the lines themselves
//! - **Best Case:** Working sets that fit in the set with good temporal locality
//! - **Worst Case:** Cyclic scans one line larger than the set (thrashing)

use super::ReplacementPolicy;
use crate::cache::line::CacheLine;

/// LRU Policy. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct LruPolicy;

impl LruPolicy {
    /// Creates a new LRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for LruPolicy {
    fn name(&self) -> &'static str {
        "lru"
    }

    /// Returns the first invalid way, else the oldest valid way.
    fn select_victim(&mut self, ways: &[CacheLine]) -> usize {
        if let Some(way) = ways.iter().position(|line| !line.valid) {
            return way;
        }
        let mut victim = 0;
        for (way, line) in ways.iter().enumerate() {
            if line.replace_state < ways[victim].replace_state {
                victim = way;
            }
        }
        victim
    }
}
