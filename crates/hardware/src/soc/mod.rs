//! Bus and memory components.
//!
//! This module organizes everything that moves transactions between a master and
//! the backing store: the bus, the slave trait, shared slave handles, memory, and
//! the builder that assembles a hierarchy.

/// Hierarchy builder and top-level `System`.
pub mod builder;

/// Synchronous master→slave bus.
pub mod interconnect;

/// Backing memory (DRAM).
pub mod memory;

/// Lock-serialized shared slave handles.
pub mod shared;

/// Bus slave trait definition.
pub mod traits;

pub use builder::System;
pub use interconnect::Bus;
pub use memory::Memory;
pub use shared::SharedSlave;
pub use traits::BusSlave;
