//! Bus slave trait.
//!
//! This module defines the `BusSlave` trait implemented by every component that can
//! answer transactions. It provides:
//! 1. **Identification:** `name` for logs and error messages.
//! 2. **Handling:** A single `handle` entry point taking a request payload and
//!    returning the response payload.
//! 3. **Downcasting:** Optional casts to `CacheController` or `Memory` so a hierarchy
//!    can be walked and inspected after it has been assembled.
//!
//! All implementors must be `Send + Sync` so hierarchies can move between threads.

use crate::cache::CacheController;
use crate::common::BusError;
use crate::protocol::{Payload, RequestPacket, ResponsePacket};
use crate::soc::memory::Memory;

/// A component that answers bus transactions.
///
/// A cache controller is both a slave (through this trait) and a master (through
/// the [`Bus`](crate::soc::interconnect::Bus) it owns for its misses).
pub trait BusSlave: Send + Sync {
    /// Returns a short name for this slave (e.g. `"L1"`, `"DRAM"`).
    fn name(&self) -> &str;

    /// Services one transaction to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`BusError`] if the request cannot be serviced, including
    /// failures of any nested downstream transaction.
    fn handle(&mut self, request: Payload<RequestPacket>)
    -> Result<Payload<ResponsePacket>, BusError>;

    /// Returns this slave as a cache controller if it is one; otherwise `None`.
    fn as_cache(&self) -> Option<&CacheController> {
        None
    }
    /// Returns a mutable reference as `CacheController` if this slave is a cache.
    fn as_cache_mut(&mut self) -> Option<&mut CacheController> {
        None
    }
    /// Returns this slave as backing memory if it is one; otherwise `None`.
    fn as_memory(&self) -> Option<&Memory> {
        None
    }
    /// Returns a mutable reference as `Memory` if this slave is backing memory.
    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        None
    }
}
