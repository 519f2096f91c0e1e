//! Cache controller and transactional memory bus library.
//!
//! This crate implements a discrete-event, set-associative cache hierarchy with the following:
//! 1. **Protocol:** Request/response packets (read, write, inval, clean, flush, zero,
//!    prefetch, line read, line write) and the payload envelope carrying them.
//! 2. **Cache:** Address decoding, line storage, pluggable replacement policies, and a
//!    controller that is a bus slave upstream and a bus master downstream.
//! 3. **SoC:** The synchronous bus, backing memory, shared slave handles, and a builder
//!    that chains caches into a hierarchy.
//! 4. **Simulation:** Configuration, request traces, and per-cache statistics.

/// Cache geometry, storage, policies, controller, and request router.
pub mod cache;
/// Common types and constants (address codec, access sizes, errors).
pub mod common;
/// Hierarchy configuration (defaults, enums, JSON structures).
pub mod config;
/// Packet and payload definitions.
pub mod protocol;
/// Request trace parsing.
pub mod sim;
/// Bus, memory, shared slaves, and the hierarchy builder.
pub mod soc;
/// Per-cache statistics.
pub mod stats;

/// Cache controller; register it on a bus as any other slave.
pub use crate::cache::CacheController;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level hierarchy; construct with `System::new`.
pub use crate::soc::System;
