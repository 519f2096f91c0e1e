//! System-wide constants.
//!
//! Limits on the configurable address space and line geometry. Line data is held
//! in a single 64-bit word, which bounds the line size at eight bytes.

/// Address width of the reference design (8 bits, 256 bytes).
pub const DEFAULT_ADDRESS_WIDTH: u32 = 8;

/// Largest supported address width.
///
/// Backing memory allocates `2^width` bytes, so this caps it at 16 MiB.
pub const MAX_ADDRESS_WIDTH: u32 = 24;

/// Largest number of offset bits (8-byte lines).
pub const MAX_OFFSET_BITS: u32 = 3;

/// Largest line size in bytes.
pub const MAX_LINE_BYTES: usize = 1 << MAX_OFFSET_BITS;

/// Bits per byte, used when shifting bytes in and out of line words.
pub const BYTE_BITS: u32 = 8;
