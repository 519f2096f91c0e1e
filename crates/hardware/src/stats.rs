//! Cache statistics collection and reporting.
//!
//! Each controller keeps its own counters. It tracks:
//! 1. **Lookups:** Hits and misses per line segment accessed.
//! 2. **Traffic:** Line fetches and dirty writebacks issued downstream.
//! 3. **Replacement:** Evictions of valid victims and explicit invalidations.

use std::fmt;

use serde::Serialize;

/// Per-controller counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found the line resident.
    pub hits: u64,
    /// Lookups that had to allocate a line.
    pub misses: u64,
    /// Valid lines replaced on a miss.
    pub evictions: u64,
    /// Dirty lines written to the next level.
    pub writebacks: u64,
    /// Lines fetched from the next level.
    pub fetches: u64,
    /// Lines discarded by inval or flush.
    pub invalidations: u64,
}

impl CacheStats {
    /// Returns the total number of lookups.
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Returns the hit rate in `[0, 1]`, or 0 when there were no accesses.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for CacheStats {
    /// Formats a one-line summary of the counters.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "accesses {:>6}  hits {:>6}  misses {:>6}  hit rate {:>6.2}%  \
             evictions {:>5}  writebacks {:>5}  fetches {:>5}  invalidations {:>5}",
            self.accesses(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0,
            self.evictions,
            self.writebacks,
            self.fetches,
            self.invalidations
        )
    }
}
