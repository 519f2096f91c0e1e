use std::sync::{Arc, Mutex};

use cachebus_core::common::BusError;
use cachebus_core::protocol::{Payload, RequestPacket, ResponsePacket};
use cachebus_core::soc::BusSlave;

/// Requests seen by a [`RecordingSlave`], in arrival order.
pub type RequestLog = Arc<Mutex<Vec<RequestPacket>>>;

/// Forwards every request to `inner` after appending it to a shared log.
pub struct RecordingSlave<S> {
    inner: S,
    log: RequestLog,
}

impl<S: BusSlave> RecordingSlave<S> {
    pub fn new(inner: S) -> (Self, RequestLog) {
        let log = RequestLog::default();
        (
            Self {
                inner,
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl<S: BusSlave> BusSlave for RecordingSlave<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn handle(
        &mut self,
        request: Payload<RequestPacket>,
    ) -> Result<Payload<ResponsePacket>, BusError> {
        self.log.lock().unwrap().push(request.packet);
        self.inner.handle(request)
    }
}
