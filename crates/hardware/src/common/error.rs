//! Configuration and bus transaction errors.
//!
//! This module defines the two failure classes of the simulator:
//! 1. **Configuration errors:** Illegal geometry or unreadable configuration, detected
//!    eagerly when a cache, memory, or system is constructed.
//! 2. **Bus errors:** Failures surfaced while a transaction is in flight, such as a bus
//!    with no registered slave or a reply of the wrong kind.
//!
//! A management miss (invalidate/clean/flush of a non-resident address) is not an
//! error; it is reported through the response's `success` flag.

use thiserror::Error;

use super::constants::{MAX_ADDRESS_WIDTH, MAX_OFFSET_BITS};
use crate::protocol::PacketKind;

/// Errors detected while building caches, memories, or a whole system.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The address width is zero or larger than [`MAX_ADDRESS_WIDTH`].
    #[error("address width {0} is outside 1..={max}", max = MAX_ADDRESS_WIDTH)]
    AddressWidth(u32),

    /// The line would be wider than the 64-bit line data word.
    #[error("offset bits {0} exceed the limit of {max} (8-byte lines)", max = MAX_OFFSET_BITS)]
    LineTooWide(u32),

    /// Offset and set fields do not fit in the address.
    #[error(
        "offset bits ({offset_bits}) + set bits ({set_bits}) exceed address width {address_width}"
    )]
    Geometry {
        /// Requested offset bits.
        offset_bits: u32,
        /// Requested set bits.
        set_bits: u32,
        /// Configured address width.
        address_width: u32,
    },

    /// A geometry was requested with no ways per set.
    #[error("a cache set must have at least one way")]
    NoWays,

    /// A configured cache level has no ways per set.
    #[error("cache '{0}' must have at least one way")]
    ZeroWays(String),

    /// A memory preload image does not fit in the address space.
    #[error("preload at {base:#x} ({len} bytes) exceeds the {size}-byte address space")]
    PreloadOutOfRange {
        /// Base address of the image.
        base: u64,
        /// Image length in bytes.
        len: usize,
        /// Size of the backing memory in bytes.
        size: usize,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration text is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while a bus transaction is being performed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BusError {
    /// A transaction was issued on a bus with no slave handler.
    #[error("bus '{bus}' has no registered slave")]
    NoSlave {
        /// Label of the unconnected bus.
        bus: String,
    },

    /// A reply of the wrong kind came back for a request.
    #[error("protocol mismatch: expected a {expected} response, got {got}")]
    ProtocolMismatch {
        /// Kind of the request that was issued.
        expected: PacketKind,
        /// Kind of the response that arrived.
        got: PacketKind,
    },

    /// The downstream slave refused a dirty line writeback.
    #[error("writeback of line {addr:#x} was rejected downstream")]
    WritebackRejected {
        /// Base address of the line.
        addr: u64,
    },

    /// The slave cannot service this request kind.
    #[error("'{slave}' does not support {kind} requests")]
    Unsupported {
        /// Name of the slave.
        slave: String,
        /// Rejected request kind.
        kind: PacketKind,
    },

    /// A line request named a line size other than 1, 2, 4, or 8 bytes.
    #[error("invalid line size {0}: expected 1, 2, 4 or 8 bytes")]
    InvalidLineSize(usize),

    /// A line request does not match the cache's line size.
    #[error("'{slave}' has {expected}-byte lines, request named {requested}")]
    LineSizeMismatch {
        /// Name of the cache.
        slave: String,
        /// The cache's line size in bytes.
        expected: usize,
        /// The line size carried by the request.
        requested: usize,
    },

    /// A replacement policy picked a way that does not exist.
    #[error("replacement policy chose way {way} in a {ways}-way set")]
    VictimOutOfRange {
        /// Way returned by the policy.
        way: usize,
        /// Associativity of the set.
        ways: usize,
    },

    /// A shared slave's admission lock was poisoned by a panicking holder.
    #[error("lock for shared slave '{slave}' is poisoned")]
    Poisoned {
        /// Name of the shared slave.
        slave: String,
    },
}
