//! Transaction envelope.
//!
//! A [`Payload`] wraps one packet with a transaction id and a human-readable
//! label. The id is echoed back in the reply and is reserved for multiplexed
//! routing; nothing relies on it for correctness today.

use serde::{Deserialize, Serialize};

/// A packet in flight on a bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload<T> {
    /// Transaction identifier, echoed by the reply.
    pub id: u64,
    /// Human-readable description of the transaction.
    pub label: String,
    /// The wrapped packet.
    pub packet: T,
}

impl<T> Payload<T> {
    /// Creates a new payload.
    ///
    /// # Arguments
    ///
    /// * `id` - Transaction identifier.
    /// * `label` - Description shown in logs and traces.
    /// * `packet` - The request or response to carry.
    pub fn new(id: u64, label: impl Into<String>, packet: T) -> Self {
        Self {
            id,
            label: label.into(),
            packet,
        }
    }

    /// Builds the reply to this payload, keeping its transaction id.
    pub fn reply<U>(&self, label: impl Into<String>, packet: U) -> Payload<U> {
        Payload::new(self.id, label, packet)
    }

    /// Unwraps the envelope, returning the packet.
    pub fn into_packet(self) -> T {
        self.packet
    }
}
