//! SmsReceiver - transport entry point
//!
//! Filters transport events down to SMS deliveries, then normalizes and
//! relays each delivery while holding the delivery lock. Deliveries never
//! overlap.

use parking_lot::Mutex;
use smsbridge_core::branding::SMS_RECEIVED_ACTION;
use smsbridge_core::{EventNormalizer, TransportEvent};
use tracing::{debug, trace};

use crate::relay::Relay;

pub struct SmsReceiver {
    normalizer: EventNormalizer,
    relay: Relay,
    delivery_lock: Mutex<()>,
}

impl SmsReceiver {
    pub fn new(relay: Relay) -> Self {
        Self {
            normalizer: EventNormalizer::new(),
            relay,
            delivery_lock: Mutex::new(()),
        }
    }

    /// Handle one transport event. Returns the number of events delivered to
    /// the consumer.
    pub fn on_receive(&self, event: &TransportEvent) -> usize {
        debug!(action = %event.action, "[SmsReceiver] on_receive called");

        if event.action != SMS_RECEIVED_ACTION {
            trace!(action = %event.action, "[SmsReceiver] Ignoring unrelated action");
            return 0;
        }

        let _delivery = self.delivery_lock.lock();
        let records = self.normalizer.normalize(event.batch.as_ref());
        debug!(records = records.len(), "[SmsReceiver] Relaying delivery");
        self.relay.relay(records)
    }
}
