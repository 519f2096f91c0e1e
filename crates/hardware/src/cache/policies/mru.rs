//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the line touched most recently. It behaves well on cyclic
//! access patterns larger than a set, where LRU evicts every line just before
//! it is reused. Invalid ways are still taken first.

use super::ReplacementPolicy;
use crate::cache::line::CacheLine;

/// MRU Policy. Stateless.
#[derive(Clone, Copy, Debug, Default)]
pub struct MruPolicy;

impl MruPolicy {
    /// Creates a new MRU policy instance.
    pub const fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for MruPolicy {
    fn name(&self) -> &'static str {
        "mru"
    }

    fn select_victim(&mut self, ways: &[CacheLine]) -> usize {
        if let Some(way) = ways.iter().position(|line| !line.valid) {
            return way;
        }
        let mut victim = 0;
        for (way, line) in ways.iter().enumerate() {
            if line.replace_state > ways[victim].replace_state {
                victim = way;
            }
        }
        victim
    }
}
