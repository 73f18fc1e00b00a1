//! Relay - forwards normalized records to the consumer
//!
//! One record, one push, in order. Delivery is at-most-once: with no
//! consumer attached the event is simply gone.

use std::sync::Arc;

use smsbridge_core::{NormalizedRecord, RelayEvent};
use tracing::debug;

use crate::gateway::{BridgeGateway, PushOutcome};

/// Publishes records through the gateway's self-originated push path.
pub struct Relay {
    gateway: Arc<BridgeGateway>,
}

impl Relay {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self { gateway }
    }

    /// Push each record as its own event. Returns how many were handed to a
    /// consumer.
    pub fn relay(&self, records: Vec<NormalizedRecord>) -> usize {
        records.into_iter().fold(0, |delivered, record| {
            debug!(
                sender = record.sender(),
                body_len = record.body().len(),
                timestamp = record.timestamp_millis(),
                "[Relay] Forwarding message"
            );

            match self.gateway.push(RelayEvent::received(record)) {
                PushOutcome::Delivered => {
                    debug!("[Relay] Event delivered to consumer");
                    delivered + 1
                }
                outcome => {
                    debug!(?outcome, "[Relay] Event not delivered");
                    delivered
                }
            }
        })
    }
}
