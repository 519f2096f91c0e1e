//! Request and response packets.
//!
//! Every transaction carries exactly one [`RequestPacket`] and is answered with the
//! [`ResponsePacket`] of the same [`PacketKind`]. Addresses are raw; the receiving
//! slave masks them to its own address width before use.
//!
//! The `Display` form of a request is the line syntax accepted by
//! [`sim::trace`](crate::sim::trace), so a printed request can be replayed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::AccessSize;

/// Discriminant shared by a request and its response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    /// Byte-range read.
    Read,
    /// Byte-range write.
    Write,
    /// Invalidate without writeback.
    Inval,
    /// Write back dirty data, keep the line.
    Clean,
    /// Write back dirty data, then invalidate.
    Flush,
    /// Allocate a zeroed, dirty line without fetching.
    Zero,
    /// Bring a line in without returning data.
    Prefetch,
    /// Read a whole line.
    LineRead,
    /// Masked write of a whole line.
    LineWrite,
}

impl PacketKind {
    /// Returns the lowercase wire name of this kind (e.g. `"line_read"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Inval => "inval",
            Self::Clean => "clean",
            Self::Flush => "flush",
            Self::Zero => "zero",
            Self::Prefetch => "prefetch",
            Self::LineRead => "line_read",
            Self::LineWrite => "line_write",
        }
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a management request (`inval`, `clean`, `flush`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Every line in the cache.
    Global,
    /// The line containing this address.
    Address(u64),
}

impl Scope {
    /// Returns `true` for address-less requests.
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Address(addr) => write!(f, "{addr:#04x}"),
        }
    }
}

/// A request issued by a bus master.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestPacket {
    /// Read `size` bytes starting at `addr` (little-endian).
    Read {
        /// Start address.
        addr: u64,
        /// Access width.
        size: AccessSize,
    },
    /// Write the low `size` bytes of `value` starting at `addr` (little-endian).
    Write {
        /// Start address.
        addr: u64,
        /// Access width.
        size: AccessSize,
        /// Value to store.
        value: u64,
    },
    /// Discard a line, or every line, without writeback.
    Inval {
        /// Line or global target.
        scope: Scope,
    },
    /// Write back dirty data and keep the line valid.
    Clean {
        /// Line or global target.
        scope: Scope,
    },
    /// Write back dirty data and invalidate.
    Flush {
        /// Line or global target.
        scope: Scope,
    },
    /// Allocate the line holding `addr` as zeroed and dirty, never fetching.
    Zero {
        /// Any address within the line.
        addr: u64,
    },
    /// Make the line holding `addr` resident without returning data.
    Prefetch {
        /// Any address within the line.
        addr: u64,
    },
    /// Read the whole line holding `addr`.
    LineRead {
        /// Any address within the line.
        addr: u64,
        /// Line size in bytes.
        line_size: usize,
    },
    /// Merge `data` into the line holding `addr`, one byte per set mask bit.
    LineWrite {
        /// Any address within the line.
        addr: u64,
        /// Line size in bytes.
        line_size: usize,
        /// New line data.
        data: u64,
        /// Bit `i` selects byte `i` of `data` (LSB = lowest address).
        write_mask: u64,
    },
}

impl RequestPacket {
    /// Returns the kind of this request.
    pub const fn kind(&self) -> PacketKind {
        match self {
            Self::Read { .. } => PacketKind::Read,
            Self::Write { .. } => PacketKind::Write,
            Self::Inval { .. } => PacketKind::Inval,
            Self::Clean { .. } => PacketKind::Clean,
            Self::Flush { .. } => PacketKind::Flush,
            Self::Zero { .. } => PacketKind::Zero,
            Self::Prefetch { .. } => PacketKind::Prefetch,
            Self::LineRead { .. } => PacketKind::LineRead,
            Self::LineWrite { .. } => PacketKind::LineWrite,
        }
    }

    /// Returns the address this request targets, or `None` for global management.
    pub const fn addr(&self) -> Option<u64> {
        match *self {
            Self::Read { addr, .. }
            | Self::Write { addr, .. }
            | Self::Zero { addr }
            | Self::Prefetch { addr }
            | Self::LineRead { addr, .. }
            | Self::LineWrite { addr, .. } => Some(addr),
            Self::Inval { scope } | Self::Clean { scope } | Self::Flush { scope } => match scope {
                Scope::Address(addr) => Some(addr),
                Scope::Global => None,
            },
        }
    }
}

impl fmt::Display for RequestPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match *self {
            Self::Read { addr, size } => write!(f, "{kind} {addr:#04x} {size}"),
            Self::Write { addr, size, value } => write!(f, "{kind} {addr:#04x} {size} {value:#x}"),
            Self::Inval { scope } | Self::Clean { scope } | Self::Flush { scope } => {
                write!(f, "{kind} {scope}")
            }
            Self::Zero { addr } | Self::Prefetch { addr } => write!(f, "{kind} {addr:#04x}"),
            Self::LineRead { addr, line_size } => write!(f, "{kind} {addr:#04x} {line_size}"),
            Self::LineWrite {
                addr,
                line_size,
                data,
                write_mask,
            } => write!(
                f,
                "{kind} {addr:#04x} {line_size} {data:#x} {write_mask:#b}"
            ),
        }
    }
}

/// A slave's answer to a [`RequestPacket`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponsePacket {
    /// Value read, zero-extended.
    Read {
        /// Little-endian value.
        value: u64,
    },
    /// Write completion.
    Write {
        /// Whether the write was stored.
        success: bool,
    },
    /// Invalidate outcome; `false` when the addressed line was not resident.
    Inval {
        /// Hit (or global) flag.
        success: bool,
    },
    /// Clean outcome; `false` when the addressed line was not resident.
    Clean {
        /// Hit (or global) flag.
        success: bool,
    },
    /// Flush outcome; `false` when the addressed line was not resident.
    Flush {
        /// Hit (or global) flag.
        success: bool,
    },
    /// Zero completion.
    Zero {
        /// Whether the line was zeroed.
        success: bool,
    },
    /// Prefetch completion; the data is not returned.
    Prefetch {
        /// Whether the line is now resident.
        success: bool,
    },
    /// Whole-line data.
    LineRead {
        /// Line contents, byte 0 in the low bits.
        data: u64,
    },
    /// Masked line write completion.
    LineWrite {
        /// Whether the write was merged.
        success: bool,
    },
}

impl ResponsePacket {
    /// Returns the kind of this response.
    pub const fn kind(&self) -> PacketKind {
        match self {
            Self::Read { .. } => PacketKind::Read,
            Self::Write { .. } => PacketKind::Write,
            Self::Inval { .. } => PacketKind::Inval,
            Self::Clean { .. } => PacketKind::Clean,
            Self::Flush { .. } => PacketKind::Flush,
            Self::Zero { .. } => PacketKind::Zero,
            Self::Prefetch { .. } => PacketKind::Prefetch,
            Self::LineRead { .. } => PacketKind::LineRead,
            Self::LineWrite { .. } => PacketKind::LineWrite,
        }
    }

    /// Returns the success flag, or `true` for data-carrying responses.
    pub const fn success(&self) -> bool {
        match *self {
            Self::Read { .. } | Self::LineRead { .. } => true,
            Self::Write { success }
            | Self::Inval { success }
            | Self::Clean { success }
            | Self::Flush { success }
            | Self::Zero { success }
            | Self::Prefetch { success }
            | Self::LineWrite { success } => success,
        }
    }

    /// Builds the flag-only response for `kind`.
    ///
    /// # Returns
    ///
    /// `None` for `Read` and `LineRead`, which carry data instead of a flag.
    pub const fn completion(kind: PacketKind, success: bool) -> Option<Self> {
        match kind {
            PacketKind::Read | PacketKind::LineRead => None,
            PacketKind::Write => Some(Self::Write { success }),
            PacketKind::Inval => Some(Self::Inval { success }),
            PacketKind::Clean => Some(Self::Clean { success }),
            PacketKind::Flush => Some(Self::Flush { success }),
            PacketKind::Zero => Some(Self::Zero { success }),
            PacketKind::Prefetch => Some(Self::Prefetch { success }),
            PacketKind::LineWrite => Some(Self::LineWrite { success }),
        }
    }
}

impl fmt::Display for ResponsePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match *self {
            Self::Read { value } => write!(f, "{kind} -> {value:#x}"),
            Self::LineRead { data } => write!(f, "{kind} -> {data:#x}"),
            _ => write!(
                f,
                "{kind} -> {}",
                if self.success() { "ok" } else { "miss" }
            ),
        }
    }
}
