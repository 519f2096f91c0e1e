//! Address codec.
//!
//! Pure functions that split an address into its (tag, set index, offset) fields
//! and rebuild a line's base address from a tag and set index. Every address is
//! masked to the system address width before it is decoded, so `decode` is total
//! over all `u64` inputs.
//!
//! ```text
//!  width-1                                     0
//! +----------------+---------------+----------+
//! |      tag       |   set index   |  offset  |
//! +----------------+---------------+----------+
//!   tag_bits         set_bits        offset_bits
//! ```

use serde::Serialize;

/// The three fields of a decoded address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct AddressParts {
    /// High-order bits identifying the line within its set.
    pub tag: u64,
    /// Index of the set the line maps to (0 when there are no set bits).
    pub set: usize,
    /// Byte offset within the line.
    pub offset: usize,
}

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
pub const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Returns the mask that confines an address to `width` bits.
#[inline(always)]
pub const fn address_mask(width: u32) -> u64 {
    low_mask(width)
}

/// Splits `addr` into tag, set index, and offset.
///
/// # Arguments
///
/// * `addr` - Raw address; masked to `width` bits first.
/// * `width` - System address width in bits.
/// * `offset_bits` - Number of line offset bits.
/// * `set_bits` - Number of set index bits.
///
/// # Returns
///
/// The decoded [`AddressParts`].
#[inline]
pub const fn decode(addr: u64, width: u32, offset_bits: u32, set_bits: u32) -> AddressParts {
    let addr = addr & address_mask(width);
    let offset = (addr & low_mask(offset_bits)) as usize;
    let set = if set_bits > 0 {
        ((addr >> offset_bits) & low_mask(set_bits)) as usize
    } else {
        0
    };
    let shift = offset_bits + set_bits;
    let tag = if shift >= u64::BITS { 0 } else { addr >> shift };
    AddressParts { tag, set, offset }
}

/// Rebuilds the base address (offset zero) of the line identified by `tag` and `set`.
#[inline]
pub const fn encode_base(tag: u64, set: usize, offset_bits: u32, set_bits: u32) -> u64 {
    let shift = offset_bits + set_bits;
    let tag_part = if shift >= u64::BITS { 0 } else { tag << shift };
    let set_part = ((set as u64) & low_mask(set_bits)) << offset_bits;
    tag_part | set_part
}
