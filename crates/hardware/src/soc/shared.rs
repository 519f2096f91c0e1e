//! Shared slave handles.
//!
//! A [`SharedSlave`] puts a slave behind one `Arc<Mutex<_>>` admission lock so it
//! can be registered on several buses (several masters) or kept reachable after
//! registration. Transactions through any clone are serialized: each one runs to
//! completion, including its nested transactions, before the next is admitted.

use std::sync::{Arc, Mutex};

use super::traits::BusSlave;
use crate::common::BusError;
use crate::protocol::{Payload, RequestPacket, ResponsePacket};

/// Cloneable, lock-serialized handle to a slave.
#[derive(Debug)]
pub struct SharedSlave<S> {
    name: String,
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedSlave<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: BusSlave> SharedSlave<S> {
    /// Wraps `slave` in a new admission lock.
    pub fn new(slave: S) -> Self {
        Self {
            name: slave.name().to_owned(),
            inner: Arc::new(Mutex::new(slave)),
        }
    }

    /// Runs `f` with exclusive access to the slave.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Poisoned`] if a previous holder panicked.
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Result<R, BusError> {
        let mut guard = self.inner.lock().map_err(|_| BusError::Poisoned {
            slave: self.name.clone(),
        })?;
        Ok(f(&mut guard))
    }
}

impl<S: BusSlave> BusSlave for SharedSlave<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(
        &mut self,
        request: Payload<RequestPacket>,
    ) -> Result<Payload<ResponsePacket>, BusError> {
        self.with(|slave| slave.handle(request))?
    }
}
