//! Cache Replacement Policies.
//!
//! Implements the algorithms for selecting victim ways in set-associative caches.
//! A policy is injected into the controller at construction and sees the full set
//! on every miss; the controller never branches on which policy is installed.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (invalid ways first).
//! - `Mru`: Most Recently Used (invalid ways first).
//! - `Random`: Uniform random selection over all ways.

/// Least Recently Used replacement policy.
pub mod lru;

/// Most Recently Used replacement policy.
pub mod mru;

/// Random replacement policy.
pub mod random;

pub use lru::LruPolicy;
pub use mru::MruPolicy;
pub use random::RandomPolicy;

use super::line::CacheLine;

/// Trait for cache replacement policies.
///
/// Recency is carried by each line's `replace_state` stamp, which the cache store
/// updates on every install and hit, so policies hold no per-set bookkeeping.
pub trait ReplacementPolicy: Send + Sync {
    /// Short name for logs (e.g. `"lru"`).
    fn name(&self) -> &'static str;

    /// Selects the way to evict from a set.
    ///
    /// # Arguments
    ///
    /// * `ways` - Every way of the set, in way order. Never empty.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn select_victim(&mut self, ways: &[CacheLine]) -> usize;
}
