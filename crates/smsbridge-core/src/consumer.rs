//! Consumer channel - hand-off point between the relay and the consumer
//!
//! The relay runs on the transport's thread and must never wait for the
//! consumer. Dispatching only enqueues; the consumer drains its receiver on
//! whatever context it lives on (typically a UI-affine task).
//!
//! ```text
//!   Relay ──push──▶ Gateway ──dispatch──▶ ConsumerSender ═══▶ ConsumerReceiver ──▶ UI
//!                                          (never blocks)      (consumer's task)
//! ```

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::RelayEvent;
use crate::error::ChannelClosed;

/// Destination for relay events.
///
/// `dispatch` must return without waiting on the consumer. It runs with no
/// gateway lock held, so it may attach or detach.
pub trait ConsumerChannel: Send + Sync {
    fn dispatch(&self, event: RelayEvent) -> Result<(), ChannelClosed>;
}

/// Shared handle to a registered consumer
pub type SharedConsumer = Arc<dyn ConsumerChannel>;

/// Create a connected sender/receiver pair.
pub fn consumer_channel() -> (ConsumerSender, ConsumerReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ConsumerSender { sender }, ConsumerReceiver { receiver })
}

/// Sending half, registered with the gateway on attach.
#[derive(Clone)]
pub struct ConsumerSender {
    sender: mpsc::UnboundedSender<RelayEvent>,
}

impl ConsumerSender {
    /// Check whether the receiving half is still alive
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl ConsumerChannel for ConsumerSender {
    fn dispatch(&self, event: RelayEvent) -> Result<(), ChannelClosed> {
        self.sender.send(event).map_err(|_| {
            debug!("[Consumer] Receiver dropped, event discarded");
            ChannelClosed
        })
    }
}

/// Receiving half, owned by the consumer.
pub struct ConsumerReceiver {
    receiver: mpsc::UnboundedReceiver<RelayEvent>,
}

impl ConsumerReceiver {
    /// Receive the next event. Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        self.receiver.recv().await
    }

    /// Receive without waiting
    pub fn try_recv(&mut self) -> Option<RelayEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain everything currently queued.
    pub fn drain(&mut self) -> Vec<RelayEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
