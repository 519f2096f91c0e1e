//! Cache geometry.
//!
//! A [`CacheGeometry`] fixes the address split and shape of one cache for its
//! whole lifetime. Construction validates the bit accounting
//! `tag_bits + set_bits + offset_bits == address_width`; an illegal geometry is
//! rejected with a [`ConfigError`] before any line storage exists.

use serde::Serialize;

use crate::common::addr::{self, AddressParts};
use crate::common::constants::{MAX_ADDRESS_WIDTH, MAX_OFFSET_BITS};
use crate::common::{AccessSize, ConfigError};

/// One line-aligned piece of a multi-byte access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Masked address of the first byte of the segment.
    pub addr: u64,
    /// Byte offset of the segment within the full access value.
    pub shift: usize,
    /// Number of bytes in the segment.
    pub count: usize,
}

/// Validated, immutable cache shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheGeometry {
    address_width: u32,
    offset_bits: u32,
    set_bits: u32,
    ways: usize,
    #[serde(skip)]
    line_size: AccessSize,
}

impl CacheGeometry {
    /// Creates a geometry after checking every constraint.
    ///
    /// # Arguments
    ///
    /// * `address_width` - System address width in bits (`1..=MAX_ADDRESS_WIDTH`).
    /// * `offset_bits` - Line offset bits (`0..=MAX_OFFSET_BITS`).
    /// * `set_bits` - Set index bits.
    /// * `ways` - Associativity (at least 1).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the width is out of range, the line exceeds eight
    /// bytes, the fields overflow the address, or `ways` is zero.
    pub fn new(
        address_width: u32,
        offset_bits: u32,
        set_bits: u32,
        ways: usize,
    ) -> Result<Self, ConfigError> {
        if address_width == 0 || address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressWidth(address_width));
        }
        if offset_bits > MAX_OFFSET_BITS {
            return Err(ConfigError::LineTooWide(offset_bits));
        }
        if offset_bits + set_bits > address_width {
            return Err(ConfigError::Geometry {
                offset_bits,
                set_bits,
                address_width,
            });
        }
        if ways == 0 {
            return Err(ConfigError::NoWays);
        }
        let line_size =
            AccessSize::from_class(offset_bits as u8).ok_or(ConfigError::LineTooWide(offset_bits))?;

        Ok(Self {
            address_width,
            offset_bits,
            set_bits,
            ways,
            line_size,
        })
    }

    /// Returns the address width in bits.
    pub const fn address_width(&self) -> u32 {
        self.address_width
    }

    /// Returns the number of line offset bits.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Returns the number of set index bits.
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Returns the number of tag bits (`width - offset_bits - set_bits`).
    pub const fn tag_bits(&self) -> u32 {
        self.address_width - self.offset_bits - self.set_bits
    }

    /// Returns the associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Returns the number of sets (`2^set_bits`).
    pub const fn num_sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Returns the line size in bytes (`2^offset_bits`).
    pub const fn line_bytes(&self) -> usize {
        1 << self.offset_bits
    }

    /// Returns the access size that moves one whole line.
    pub const fn line_size(&self) -> AccessSize {
        self.line_size
    }

    /// Returns the mask confining addresses to the address width.
    pub const fn address_mask(&self) -> u64 {
        addr::address_mask(self.address_width)
    }

    /// Splits `addr` into tag, set, and offset.
    pub const fn decode(&self, addr: u64) -> AddressParts {
        addr::decode(addr, self.address_width, self.offset_bits, self.set_bits)
    }

    /// Rebuilds the base address of the line with `tag` in `set`.
    pub const fn encode_base(&self, tag: u64, set: usize) -> u64 {
        addr::encode_base(tag, set, self.offset_bits, self.set_bits) & self.address_mask()
    }

    /// Returns the base address of the line holding `addr`.
    pub const fn line_base(&self, addr: u64) -> u64 {
        addr & self.address_mask() & !addr::low_mask(self.offset_bits)
    }

    /// Splits a `count`-byte access at `addr` into line-aligned segments.
    ///
    /// Each byte address is masked to the address width, so an access running
    /// off the top of the address space continues at address 0.
    pub fn segments(&self, addr: u64, count: usize) -> Vec<Segment> {
        let mask = self.address_mask();
        let mut segments: Vec<Segment> = Vec::new();
        for i in 0..count {
            let byte_addr = addr.wrapping_add(i as u64) & mask;
            match segments.last_mut() {
                Some(seg)
                    if self.line_base(seg.addr) == self.line_base(byte_addr)
                        && seg.addr + seg.count as u64 == byte_addr =>
                {
                    seg.count += 1;
                }
                _ => segments.push(Segment {
                    addr: byte_addr,
                    shift: i,
                    count: 1,
                }),
            }
        }
        segments
    }
}
