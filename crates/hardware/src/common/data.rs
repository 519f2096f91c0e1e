//! Access size classes.
//!
//! Read and write packets carry a two-bit size class rather than a byte count.
//! The class is the base-2 logarithm of the access width:
//! 1. **Class 0:** one byte.
//! 2. **Class 1:** two bytes.
//! 3. **Class 2:** four bytes.
//! 4. **Class 3:** eight bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of a byte-granular read or write.
///
/// Serializes as its size class, so a packet carries `"size": 1` for a halfword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AccessSize {
    /// One byte (class 0).
    Byte,
    /// Two bytes (class 1).
    Half,
    /// Four bytes (class 2).
    Word,
    /// Eight bytes (class 3).
    Double,
}

impl AccessSize {
    /// Converts a size class (0..=3) into an access size.
    ///
    /// # Returns
    ///
    /// `None` when `class` is greater than 3.
    pub const fn from_class(class: u8) -> Option<Self> {
        match class {
            0 => Some(Self::Byte),
            1 => Some(Self::Half),
            2 => Some(Self::Word),
            3 => Some(Self::Double),
            _ => None,
        }
    }

    /// Converts a byte count (1, 2, 4, 8) into an access size.
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::Half),
            4 => Some(Self::Word),
            8 => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns the size class (0..=3).
    pub const fn class(self) -> u8 {
        match self {
            Self::Byte => 0,
            Self::Half => 1,
            Self::Word => 2,
            Self::Double => 3,
        }
    }

    /// Returns the access width in bytes.
    pub const fn bytes(self) -> usize {
        1 << self.class()
    }

    /// Returns a mask covering the low `bytes()` bytes of a 64-bit value.
    pub const fn value_mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            _ => (1u64 << (self.bytes() * 8)) - 1,
        }
    }
}

impl TryFrom<u8> for AccessSize {
    type Error = String;

    fn try_from(class: u8) -> Result<Self, Self::Error> {
        Self::from_class(class).ok_or_else(|| format!("size class {class} is not in 0..=3"))
    }
}

impl From<AccessSize> for u8 {
    fn from(size: AccessSize) -> Self {
        size.class()
    }
}

impl fmt::Display for AccessSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}
