//! Hierarchy construction and top-level `System` type.
//!
//! This module builds a complete cache hierarchy from configuration. It performs:
//! 1. **Validation:** Every geometry and preload image is checked before anything is built.
//! 2. **Memory setup:** Creates the backing memory and copies the preload images into it.
//! 3. **Chaining:** Builds caches bottom-up so each level's downstream bus holds the level
//!    below it; the first configured cache ends up on the top bus.

use tracing::info;

use crate::cache::CacheController;
use crate::common::{BusError, ConfigError};
use crate::config::Config;
use crate::protocol::{Payload, RequestPacket, ResponsePacket};
use crate::soc::interconnect::Bus;
use crate::soc::memory::Memory;
use crate::soc::traits::BusSlave;

/// Top-level system: the master's bus and everything reachable from it.
#[derive(Debug)]
pub struct System {
    /// Bus the master issues requests on; holds the first cache (or memory).
    bus: Bus,
    next_id: u64,
}

impl System {
    /// Builds a hierarchy from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the address width, any cache geometry, or any
    /// preload image is illegal.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut memory = Memory::new(config.address_width)?;
        for image in &config.memory.preload {
            memory.load(image.base, &image.bytes)?;
        }

        let mut slave: Box<dyn BusSlave + Send + Sync> = Box::new(memory);
        for cache in config.caches.iter().rev() {
            let downstream = Bus::with_slave(format!("{} bus", cache.name), slave);
            let controller = CacheController::from_config(cache, config.address_width, downstream)?;
            info!(
                cache = %cache.name,
                offset_bits = cache.offset_bits,
                set_bits = cache.set_bits,
                ways = cache.ways,
                policy = controller.policy_name(),
                "cache level"
            );
            slave = Box::new(controller);
        }

        Ok(Self {
            bus: Bus::with_slave("system bus", slave),
            next_id: 0,
        })
    }

    /// Issues `packet` on the top bus and returns the response.
    ///
    /// # Errors
    ///
    /// Propagates any [`BusError`] raised along the hierarchy.
    pub fn transact(&mut self, packet: RequestPacket) -> Result<Payload<ResponsePacket>, BusError> {
        let id = self.next_id;
        self.next_id += 1;
        self.bus
            .perform_transaction(Payload::new(id, format!("master: {packet}"), packet))
    }

    /// Returns the top bus.
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns the top bus mutably.
    pub const fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Returns every cache level, closest to the master first.
    pub fn caches(&self) -> Vec<&CacheController> {
        let mut levels = Vec::new();
        let mut bus = &self.bus;
        while let Some(cache) = bus.slave().and_then(|slave| slave.as_cache()) {
            levels.push(cache);
            bus = cache.downstream();
        }
        levels
    }

    /// Returns cache level `level` (0 is closest to the master) mutably.
    pub fn cache_mut(&mut self, level: usize) -> Option<&mut CacheController> {
        let mut bus = &mut self.bus;
        for _ in 0..level {
            bus = bus.slave_mut()?.as_cache_mut()?.downstream_mut();
        }
        bus.slave_mut()?.as_cache_mut()
    }

    /// Returns the backing memory at the bottom of the hierarchy.
    pub fn memory(&self) -> Option<&Memory> {
        let mut bus = &self.bus;
        while let Some(cache) = bus.slave().and_then(|slave| slave.as_cache()) {
            bus = cache.downstream();
        }
        bus.slave().and_then(|slave| slave.as_memory())
    }
}
