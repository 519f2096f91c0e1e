//! # Cache Replacement Policy Tests
//!
//! Verifies victim selection for LRU, MRU, and Random in isolation. Each policy
//! implements `ReplacementPolicy::select_victim(ways) -> usize` and sees recency
//! only through the lines' `replace_state` stamps.

use cachebus_core::cache::CacheLine;
use cachebus_core::cache::policies::{LruPolicy, MruPolicy, RandomPolicy, ReplacementPolicy};

fn valid(stamp: u64) -> CacheLine {
    CacheLine {
        valid: true,
        dirty: false,
        tag: stamp,
        data: 0,
        replace_state: stamp,
    }
}

fn invalid() -> CacheLine {
    CacheLine::default()
}

// ══════════════════════════════════════════════════════════
// 1. LRU Policy
// ══════════════════════════════════════════════════════════

#[test]
fn lru_prefers_first_invalid_way() {
    let ways = [valid(1), invalid(), invalid(), valid(2)];
    assert_eq!(LruPolicy::new().select_victim(&ways), 1);
}

#[test]
fn lru_picks_oldest_stamp() {
    let ways = [valid(7), valid(3), valid(9), valid(5)];
    assert_eq!(LruPolicy::new().select_victim(&ways), 1);
}

#[test]
fn lru_ties_go_to_lowest_way() {
    let ways = [valid(4), valid(2), valid(2), valid(8)];
    assert_eq!(LruPolicy::new().select_victim(&ways), 1);
}

#[test]
fn lru_direct_mapped_always_way_zero() {
    assert_eq!(LruPolicy::new().select_victim(&[valid(1)]), 0);
    assert_eq!(LruPolicy::new().select_victim(&[invalid()]), 0);
}

#[test]
fn lru_stale_invalid_stamp_is_still_preferred() {
    let mut stale = valid(100);
    stale.valid = false;
    let ways = [valid(1), stale];
    assert_eq!(LruPolicy::new().select_victim(&ways), 1);
}

// ══════════════════════════════════════════════════════════
// 2. MRU Policy
// ══════════════════════════════════════════════════════════

#[test]
fn mru_prefers_invalid_way() {
    let ways = [valid(9), invalid()];
    assert_eq!(MruPolicy::new().select_victim(&ways), 1);
}

#[test]
fn mru_picks_newest_stamp() {
    let ways = [valid(7), valid(3), valid(9), valid(5)];
    assert_eq!(MruPolicy::new().select_victim(&ways), 2);
}

// ══════════════════════════════════════════════════════════
// 3. Random Policy
// ══════════════════════════════════════════════════════════

#[test]
fn random_stays_in_range() {
    let ways = [valid(1), valid(2), valid(3)];
    let mut policy = RandomPolicy::new(42);
    for _ in 0..1000 {
        assert!(policy.select_victim(&ways) < ways.len());
    }
}

#[test]
fn random_is_reproducible_from_seed() {
    let ways = [invalid(); 8];
    let mut a = RandomPolicy::new(7);
    let mut b = RandomPolicy::new(7);
    let first: Vec<usize> = (0..32).map(|_| a.select_victim(&ways)).collect();
    let second: Vec<usize> = (0..32).map(|_| b.select_victim(&ways)).collect();
    assert_eq!(first, second);
}

/// Random ignores validity, so over many draws it also picks valid ways while
/// an invalid one is available.
#[test]
fn random_ignores_validity() {
    let ways = [invalid(), valid(1), valid(2), valid(3)];
    let mut policy = RandomPolicy::default();
    let picked_valid = (0..256).any(|_| policy.select_victim(&ways) != 0);
    assert!(picked_valid);
}

#[test]
fn zero_seed_still_produces_values() {
    let ways = [invalid(); 4];
    let mut policy = RandomPolicy::new(0);
    let draws: Vec<usize> = (0..64).map(|_| policy.select_victim(&ways)).collect();
    assert!(draws.iter().any(|&w| w != draws[0]));
}

#[test]
fn policy_names() {
    assert_eq!(LruPolicy::new().name(), "lru");
    assert_eq!(MruPolicy::new().name(), "mru");
    assert_eq!(RandomPolicy::default().name(), "random");
}
