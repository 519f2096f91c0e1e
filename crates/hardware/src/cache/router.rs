//! Request router.
//!
//! Makes a [`CacheController`] a bus slave: each incoming packet is matched
//! exhaustively, mapped onto the controller operation of the same kind, and
//! answered with the response of that kind. Any nested fetch or writeback runs
//! inside the operation before the response is built.

use tracing::debug;

use super::controller::CacheController;
use crate::common::BusError;
use crate::protocol::{Payload, RequestPacket, ResponsePacket};
use crate::soc::traits::BusSlave;

impl CacheController {
    /// Runs one request against the controller and builds its response.
    ///
    /// # Errors
    ///
    /// Propagates the operation's error unchanged.
    pub fn dispatch(&mut self, request: &RequestPacket) -> Result<ResponsePacket, BusError> {
        let response = match *request {
            RequestPacket::Read { addr, size } => ResponsePacket::Read {
                value: self.read(addr, size)?,
            },
            RequestPacket::Write { addr, size, value } => {
                self.write(addr, size, value)?;
                ResponsePacket::Write { success: true }
            }
            RequestPacket::Inval { scope } => ResponsePacket::Inval {
                success: self.invalidate(scope),
            },
            RequestPacket::Clean { scope } => ResponsePacket::Clean {
                success: self.clean(scope)?,
            },
            RequestPacket::Flush { scope } => ResponsePacket::Flush {
                success: self.flush(scope)?,
            },
            RequestPacket::Zero { addr } => {
                self.zero(addr)?;
                ResponsePacket::Zero { success: true }
            }
            RequestPacket::Prefetch { addr } => ResponsePacket::Prefetch {
                success: self.prefetch(addr)?,
            },
            RequestPacket::LineRead { addr, line_size } => ResponsePacket::LineRead {
                data: self.line_read(addr, line_size)?,
            },
            RequestPacket::LineWrite {
                addr,
                line_size,
                data,
                write_mask,
            } => {
                self.line_write(addr, line_size, data, write_mask)?;
                ResponsePacket::LineWrite { success: true }
            }
        };
        Ok(response)
    }
}

/// Describes how a request was served, for response labels.
fn outcome(request: &RequestPacket, response: &ResponsePacket, missed: bool) -> &'static str {
    match *request {
        RequestPacket::Inval { scope }
        | RequestPacket::Clean { scope }
        | RequestPacket::Flush { scope } => {
            if scope.is_global() {
                "global"
            } else if response.success() {
                "hit"
            } else {
                "miss"
            }
        }
        _ if missed => "miss",
        _ => "hit",
    }
}

impl BusSlave for CacheController {
    fn name(&self) -> &str {
        Self::name(self)
    }

    fn handle(
        &mut self,
        request: Payload<RequestPacket>,
    ) -> Result<Payload<ResponsePacket>, BusError> {
        let misses_before = self.stats().misses;
        let response = self.dispatch(&request.packet)?;
        let missed = self.stats().misses != misses_before;
        let outcome = outcome(&request.packet, &response, missed);
        debug!(
            cache = Self::name(self),
            id = request.id,
            request = %request.packet,
            response = %response,
            outcome,
            "handled"
        );
        Ok(request.reply(
            format!("{}: {response} ({outcome})", Self::name(self)),
            response,
        ))
    }

    fn as_cache(&self) -> Option<&CacheController> {
        Some(self)
    }

    fn as_cache_mut(&mut self) -> Option<&mut CacheController> {
        Some(self)
    }
}
