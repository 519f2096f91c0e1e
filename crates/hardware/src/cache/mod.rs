//! Set-Associative Cache Controller.
//!
//! This module implements a configurable set-associative cache that is both a bus
//! slave (for its upstream master) and a bus master (for its misses). It provides:
//! 1. **Geometry:** Validated offset/set/tag split and line segmentation.
//! 2. **Storage:** Sets of ways with a per-cache logical clock.
//! 3. **Policies:** Pluggable victim selection (LRU, MRU, Random).
//! 4. **Controller:** Hit/miss handling, writeback ordering, and management sweeps.
//! 5. **Router:** Packet dispatch to controller operations.
//! 6. **Observer:** Optional reporting of every line mutation.

/// Cache controller core operations.
pub mod controller;

/// Cache geometry and address segmentation.
pub mod geometry;

/// Cache line state and byte-lane helpers.
pub mod line;

/// Line mutation observers.
pub mod observer;

/// Cache replacement policy implementations (LRU, MRU, Random).
pub mod policies;

/// Request packet dispatch (`BusSlave` implementation).
pub mod router;

/// Line storage and victim allocation.
pub mod store;

pub use controller::CacheController;
pub use geometry::CacheGeometry;
pub use line::CacheLine;
pub use observer::{LineEvent, LineEventKind, LineObserver};
pub use store::CacheStore;
