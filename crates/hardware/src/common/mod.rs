//! Common utilities and types used throughout the cache hierarchy simulator.
//!
//! This module provides the building blocks shared by the cache, bus, and memory
//! components. It includes:
//! 1. **Address Codec:** Tag/set/offset decomposition and line base reconstruction.
//! 2. **Constants:** Address width and line size limits.
//! 3. **Access Sizes:** The size-class vocabulary used by read/write packets.
//! 4. **Error Handling:** Configuration and bus transaction error types.

/// Address codec (tag, set index, offset) and address masking.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Access size classes.
pub mod data;

/// Error types for configuration and bus transactions.
pub mod error;

pub use addr::{AddressParts, address_mask, decode, encode_base};
pub use constants::{DEFAULT_ADDRESS_WIDTH, MAX_ADDRESS_WIDTH, MAX_OFFSET_BITS};
pub use data::AccessSize;
pub use error::{BusError, ConfigError};
