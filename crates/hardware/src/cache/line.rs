//! Cache lines and line data manipulation.
//!
//! A [`CacheLine`] holds up to eight bytes of data in one little-endian word:
//! byte `i` of the line lives in bits `8*i..8*i+8`. The free functions here are
//! pure; callers decide when a write makes a line dirty.

use serde::{Deserialize, Serialize};

use crate::common::{AccessSize, BusError};
use crate::common::constants::{BYTE_BITS, MAX_LINE_BYTES};

/// One way of one set.
///
/// Invariant: `dirty` implies `valid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheLine {
    /// Line holds data for `tag`.
    pub valid: bool,
    /// Line data differs from the next level.
    pub dirty: bool,
    /// High-order address bits of the resident line.
    pub tag: u64,
    /// Line contents, byte 0 in the low bits.
    pub data: u64,
    /// Logical clock value of the last install or hit.
    pub replace_state: u64,
}

impl CacheLine {
    /// Fills the line with freshly fetched data: valid and clean.
    pub const fn install(&mut self, tag: u64, data: u64) {
        self.valid = true;
        self.dirty = false;
        self.tag = tag;
        self.data = data;
    }

    /// Allocates the line as zeroed and dirty without fetching.
    pub const fn zero(&mut self, tag: u64) {
        self.valid = true;
        self.dirty = true;
        self.tag = tag;
        self.data = 0;
    }

    /// Clears the dirty bit after a writeback.
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Discards the line without writeback.
    pub const fn invalidate(&mut self) {
        self.valid = false;
        self.dirty = false;
    }

    /// Returns `true` when the line holds data that must be written back.
    pub const fn needs_writeback(&self) -> bool {
        self.valid && self.dirty
    }

    /// Returns `true` when the line is valid and holds `tag`.
    pub const fn matches(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }
}

#[inline(always)]
const fn byte_shift(index: usize) -> u32 {
    (index as u32) * BYTE_BITS
}

/// Returns a mask covering the low `count` bytes of a word.
#[inline]
pub const fn byte_mask(count: usize) -> u64 {
    if count >= MAX_LINE_BYTES {
        u64::MAX
    } else {
        (1u64 << byte_shift(count)) - 1
    }
}

/// Reads `count` bytes of `data` starting at byte `offset`.
///
/// Bytes past the end of the word read as zero.
pub const fn read_bytes(data: u64, offset: usize, count: usize) -> u64 {
    if offset >= MAX_LINE_BYTES {
        return 0;
    }
    (data >> byte_shift(offset)) & byte_mask(count)
}

/// Returns `data` with `count` bytes of `value` stored at byte `offset`.
///
/// Bytes that would land past the end of the word are dropped.
pub const fn write_bytes(data: u64, offset: usize, value: u64, count: usize) -> u64 {
    let mut out = data;
    let mut i = 0;
    while i < count {
        let dst = offset + i;
        if dst < MAX_LINE_BYTES && i < MAX_LINE_BYTES {
            let byte = (value >> byte_shift(i)) & 0xFF;
            out &= !(0xFF << byte_shift(dst));
            out |= byte << byte_shift(dst);
        }
        i += 1;
    }
    out
}

/// Checks a line size carried by a `line_read`/`line_write` request.
///
/// # Errors
///
/// Returns [`BusError::InvalidLineSize`] unless `line_size` is 1, 2, 4, or 8.
pub const fn check_line_size(line_size: usize) -> Result<(), BusError> {
    if AccessSize::from_bytes(line_size).is_some() {
        Ok(())
    } else {
        Err(BusError::InvalidLineSize(line_size))
    }
}

/// Merges `new` into `old` one byte at a time.
///
/// Byte `i` (for `i < line_size`) comes from `new` when bit `i` of `mask` is set
/// and from `old` otherwise. Bytes at or above `line_size` keep `old`.
pub const fn apply_write_mask(old: u64, new: u64, mask: u64, line_size: usize) -> u64 {
    let mut out = old;
    let mut i = 0;
    while i < line_size && i < MAX_LINE_BYTES {
        if mask & (1 << i) != 0 {
            let lane = 0xFFu64 << byte_shift(i);
            out = (out & !lane) | (new & lane);
        }
        i += 1;
    }
    out
}
