//! Bus interconnect.
//!
//! This module implements the synchronous master→slave bus. It provides:
//! 1. **Registration:** Exactly one slave handler per bus; registering replaces the old one.
//! 2. **Transactions:** `perform_transaction` delivers a request and returns the reply,
//!    running any nested transactions the slave issues before it returns.
//! 3. **Inspection:** Access to the registered slave and a transaction counter.
//!
//! A bus with no slave is a configuration error: `perform_transaction` reports it as
//! [`BusError::NoSlave`] instead of answering.

use tracing::{trace, warn};

use super::traits::BusSlave;
use crate::common::BusError;
use crate::protocol::{Payload, RequestPacket, ResponsePacket};

/// A point-to-point request/response channel to one slave.
pub struct Bus {
    label: String,
    /// Registered handler (boxed for dynamic dispatch; `Send + Sync` for thread safety).
    slave: Option<Box<dyn BusSlave + Send + Sync>>,
    transactions: u64,
}

impl Bus {
    /// Creates an unconnected bus.
    ///
    /// # Arguments
    ///
    /// * `label` - Name used in logs and in [`BusError::NoSlave`].
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slave: None,
            transactions: 0,
        }
    }

    /// Creates a bus with `slave` already registered.
    pub fn with_slave(label: impl Into<String>, slave: Box<dyn BusSlave + Send + Sync>) -> Self {
        let mut bus = Self::new(label);
        bus.slave = Some(slave);
        bus
    }

    /// Registers the slave handler.
    ///
    /// # Returns
    ///
    /// The previously registered slave, if any.
    pub fn register(
        &mut self,
        slave: Box<dyn BusSlave + Send + Sync>,
    ) -> Option<Box<dyn BusSlave + Send + Sync>> {
        trace!(bus = %self.label, slave = slave.name(), "register");
        self.slave.replace(slave)
    }

    /// Removes and returns the registered slave.
    pub fn unregister(&mut self) -> Option<Box<dyn BusSlave + Send + Sync>> {
        self.slave.take()
    }

    /// Returns the bus label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` when a slave is registered.
    pub const fn is_connected(&self) -> bool {
        self.slave.is_some()
    }

    /// Returns the number of transactions performed on this bus.
    pub const fn transactions(&self) -> u64 {
        self.transactions
    }

    /// Returns the registered slave.
    pub fn slave(&self) -> Option<&(dyn BusSlave + Send + Sync)> {
        self.slave.as_deref()
    }

    /// Returns the registered slave mutably.
    pub fn slave_mut(&mut self) -> Option<&mut Box<dyn BusSlave + Send + Sync>> {
        self.slave.as_mut()
    }

    /// Delivers `request` to the registered slave and returns its reply.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::NoSlave`] if nothing is registered, and propagates any
    /// error raised by the slave.
    pub fn perform_transaction(
        &mut self,
        request: Payload<RequestPacket>,
    ) -> Result<Payload<ResponsePacket>, BusError> {
        let Some(slave) = self.slave.as_mut() else {
            return Err(BusError::NoSlave {
                bus: self.label.clone(),
            });
        };
        self.transactions += 1;
        let kind = request.packet.kind();
        trace!(
            bus = %self.label,
            slave = slave.name(),
            id = request.id,
            addr = ?request.packet.addr(),
            request = %request.packet,
            "transaction"
        );

        let response = slave.handle(request)?;
        if response.packet.kind() != kind {
            warn!(
                bus = %self.label,
                expected = %kind,
                got = %response.packet.kind(),
                "reply kind does not match request"
            );
        }
        trace!(bus = %self.label, id = response.id, response = %response.packet, "reply");
        Ok(response)
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("label", &self.label)
            .field("slave", &self.slave.as_ref().map(|s| s.name().to_owned()))
            .field("transactions", &self.transactions)
            .finish()
    }
}
