//! Backing byte buffer.
//!
//! A flat, zero-initialized byte array of `2^width` bytes. Every byte address is
//! masked to the width, so multi-byte accesses that run off the end wrap to
//! address 0. Multi-byte values are little-endian.

use crate::common::addr::address_mask;
use crate::common::constants::MAX_LINE_BYTES;

/// Flat address space of `2^width` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryBuffer {
    bytes: Vec<u8>,
    mask: u64,
}

impl MemoryBuffer {
    /// Creates a zeroed buffer covering a `width`-bit address space.
    pub fn new(width: u32) -> Self {
        Self {
            bytes: vec![0; 1usize << width],
            mask: address_mask(width),
        }
    }

    /// Returns the size of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    #[inline(always)]
    const fn index(&self, addr: u64) -> usize {
        (addr & self.mask) as usize
    }

    /// Reads one byte.
    pub fn read_u8(&self, addr: u64) -> u8 {
        self.bytes[self.index(addr)]
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, addr: u64, val: u8) {
        let idx = self.index(addr);
        self.bytes[idx] = val;
    }

    /// Reads `count` bytes (at most eight) as a little-endian value.
    pub fn read_le(&self, addr: u64, count: usize) -> u64 {
        (0..count.min(MAX_LINE_BYTES)).fold(0, |value, i| {
            value | (u64::from(self.read_u8(addr.wrapping_add(i as u64))) << (i * 8))
        })
    }

    /// Writes the low `count` bytes (at most eight) of `value` little-endian.
    pub fn write_le(&mut self, addr: u64, value: u64, count: usize) {
        for i in 0..count.min(MAX_LINE_BYTES) {
            self.write_u8(addr.wrapping_add(i as u64), (value >> (i * 8)) as u8);
        }
    }

    /// Copies `data` into the buffer starting at `addr`.
    pub fn write_slice(&mut self, addr: u64, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u64), *byte);
        }
    }
}
