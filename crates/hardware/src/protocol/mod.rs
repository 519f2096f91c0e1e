//! Bus wire protocol.
//!
//! The vocabulary exchanged between masters and slaves:
//! 1. **Packets:** Closed sum types for the nine request kinds and their responses.
//! 2. **Payload:** The envelope carrying a packet, a transaction id, and a label.

/// Request and response packet definitions.
pub mod packet;

/// Transaction envelope.
pub mod payload;

pub use packet::{PacketKind, RequestPacket, ResponsePacket, Scope};
pub use payload::Payload;
