//! Backing memory (DRAM).
//!
//! This module implements the terminal slave at the bottom of every hierarchy. It provides:
//! 1. **Buffer:** A flat `2^width`-byte [`MemoryBuffer`] with masked, little-endian access.
//! 2. **Memory:** The [`BusSlave`] that answers byte reads/writes and whole-line transfers.
//!
//! Memory holds no lines, so management requests (`inval`, `clean`, `flush`, `prefetch`)
//! always report `success: false`. A `zero` request has no meaning without allocation
//! and is rejected with [`BusError::Unsupported`].

/// Flat byte storage for the memory slave.
pub mod buffer;

use tracing::trace;

pub use self::buffer::MemoryBuffer;
use crate::cache::line::{apply_write_mask, check_line_size};
use crate::common::constants::MAX_ADDRESS_WIDTH;
use crate::common::{BusError, ConfigError};
use crate::protocol::{PacketKind, Payload, RequestPacket, ResponsePacket};
use crate::soc::traits::BusSlave;

/// Slave name used in logs, labels, and errors.
const NAME: &str = "DRAM";

/// System memory: the only component that persists data beyond a line's lifetime.
#[derive(Clone, Debug)]
pub struct Memory {
    buffer: MemoryBuffer,
    address_width: u32,
}

impl Memory {
    /// Creates zero-filled memory covering a `address_width`-bit address space.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AddressWidth`] if the width is zero or larger than
    /// [`MAX_ADDRESS_WIDTH`].
    pub fn new(address_width: u32) -> Result<Self, ConfigError> {
        if address_width == 0 || address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressWidth(address_width));
        }
        Ok(Self {
            buffer: MemoryBuffer::new(address_width),
            address_width,
        })
    }

    /// Returns the address width in bits.
    pub const fn address_width(&self) -> u32 {
        self.address_width
    }

    /// Returns the memory size in bytes.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Reads one byte without going through the bus.
    pub fn peek(&self, addr: u64) -> u8 {
        self.buffer.read_u8(addr)
    }

    /// Copies `bytes` into memory starting at `base`.
    ///
    /// Used to preload an image before any transaction runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PreloadOutOfRange`] if the image does not fit
    /// between `base` and the top of the address space.
    pub fn load(&mut self, base: u64, bytes: &[u8]) -> Result<(), ConfigError> {
        let size = self.size();
        let fits = usize::try_from(base)
            .ok()
            .and_then(|start| start.checked_add(bytes.len()))
            .is_some_and(|end| end <= size);
        if !fits {
            return Err(ConfigError::PreloadOutOfRange {
                base,
                len: bytes.len(),
                size,
            });
        }
        self.buffer.write_slice(base, bytes);
        Ok(())
    }

    /// Returns the whole address space.
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Aligns `addr` down to a `line_size`-byte boundary.
    const fn align(addr: u64, line_size: usize) -> u64 {
        addr & !(line_size as u64 - 1)
    }

    fn service(&mut self, request: &RequestPacket) -> Result<ResponsePacket, BusError> {
        let response = match *request {
            RequestPacket::Read { addr, size } => ResponsePacket::Read {
                value: self.buffer.read_le(addr, size.bytes()),
            },
            RequestPacket::Write { addr, size, value } => {
                self.buffer.write_le(addr, value, size.bytes());
                ResponsePacket::Write { success: true }
            }
            RequestPacket::LineRead { addr, line_size } => {
                check_line_size(line_size)?;
                ResponsePacket::LineRead {
                    data: self
                        .buffer
                        .read_le(Self::align(addr, line_size), line_size),
                }
            }
            RequestPacket::LineWrite {
                addr,
                line_size,
                data,
                write_mask,
            } => {
                check_line_size(line_size)?;
                let base = Self::align(addr, line_size);
                let old = self.buffer.read_le(base, line_size);
                let merged = apply_write_mask(old, data, write_mask, line_size);
                self.buffer.write_le(base, merged, line_size);
                ResponsePacket::LineWrite { success: true }
            }
            // Memory holds no lines, so management requests always miss.
            RequestPacket::Inval { .. }
            | RequestPacket::Clean { .. }
            | RequestPacket::Flush { .. }
            | RequestPacket::Prefetch { .. } => {
                ResponsePacket::completion(request.kind(), false).ok_or_else(|| {
                    BusError::Unsupported {
                        slave: NAME.to_owned(),
                        kind: request.kind(),
                    }
                })?
            }
            RequestPacket::Zero { .. } => {
                return Err(BusError::Unsupported {
                    slave: NAME.to_owned(),
                    kind: PacketKind::Zero,
                });
            }
        };
        Ok(response)
    }
}

impl BusSlave for Memory {
    fn name(&self) -> &str {
        NAME
    }

    fn handle(
        &mut self,
        request: Payload<RequestPacket>,
    ) -> Result<Payload<ResponsePacket>, BusError> {
        let response = self.service(&request.packet)?;
        trace!(request = %request.packet, response = %response, "dram");
        Ok(request.reply(format!("{NAME}: {response}"), response))
    }

    fn as_memory(&self) -> Option<&Memory> {
        Some(self)
    }

    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        Some(self)
    }
}
