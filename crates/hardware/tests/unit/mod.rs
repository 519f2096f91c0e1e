//! # Unit Components
//!
//! This module mirrors the library layout: one test module per source module,
//! plus scenario and property tests for the cache controller.




/// Packet vocabulary and payload envelope.
pub mod protocol;
