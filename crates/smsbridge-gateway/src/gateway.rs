//! Bridge Gateway - the single channel between the consumer and the bridge
//!
//! Two directions share one gateway:
//!
//! ```text
//!   Consumer ──handle(request)──▶ Gateway ──▶ QueryBridge ──▶ Store
//!   Consumer ◀──dispatch(event)── Gateway ◀── Relay
//! ```
//!
//! Attachment is a two-state machine: `Detached --attach--> Attached
//! --detach--> Detached`. At most one consumer is attached; attaching again
//! replaces it. Pushing while detached is a no-op. Requests are served in
//! both states.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use smsbridge_core::{
    BridgeConfig, BridgeRequest, BridgeResponse, ReceiverExport, RelayEvent, SharedConsumer,
    INVALID_REQUEST, SCAN_ALL, SCAN_ERROR,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::query::QueryBridge;

/// Serialized fallback if a response cannot be encoded
const ENCODE_FAILURE: &str =
    r#"{"status":"error","code":"SCAN_ERROR","message":"Failed to encode response"}"#;

/// Consumer attachment state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentState {
    Detached,
    Attached,
}

/// What happened to a pushed event. None of these is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Handed off to the consumer
    Delivered,
    /// No consumer attached; dropped
    Detached,
    /// Origin is another application and the channel is not exported
    Rejected,
    /// Consumer's receiving side is gone
    ConsumerGone,
}

struct Attachment {
    id: Uuid,
    consumer: SharedConsumer,
    export: ReceiverExport,
    attached_at: DateTime<Utc>,
}

/// Process-wide gateway between one consumer and the bridge.
pub struct BridgeGateway {
    app_id: String,
    channel: String,
    attachment: RwLock<Option<Attachment>>,
    query: Arc<QueryBridge>,
    /// At most one store scan in flight, including scans that outlived
    /// their request's timeout
    scan_lock: Arc<Mutex<()>>,
    scan_timeout: Duration,
}

impl BridgeGateway {
    pub fn new(config: &BridgeConfig, query: Arc<QueryBridge>) -> Self {
        Self {
            app_id: config.app_id.clone(),
            channel: config.channel.clone(),
            attachment: RwLock::new(None),
            query,
            scan_lock: Arc::new(Mutex::new(())),
            scan_timeout: config.scan_timeout(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn state(&self) -> AttachmentState {
        if self.attachment.read().is_some() {
            AttachmentState::Attached
        } else {
            AttachmentState::Detached
        }
    }

    /// Register the consumer, replacing any previous one. Returns the
    /// attachment id.
    pub fn attach(&self, consumer: SharedConsumer, export: ReceiverExport) -> Uuid {
        let attachment = Attachment {
            id: Uuid::new_v4(),
            consumer,
            export,
            attached_at: Utc::now(),
        };
        let id = attachment.id;

        let previous = self.attachment.write().replace(attachment);
        match previous {
            Some(old) => info!(
                attachment_id = %id,
                replaced = %old.id,
                attached_for_ms = (Utc::now() - old.attached_at).num_milliseconds(),
                "[Gateway] Consumer re-attached on {}",
                self.channel
            ),
            None => info!(
                attachment_id = %id,
                export = ?export,
                "[Gateway] Consumer attached on {}",
                self.channel
            ),
        }
        id
    }

    /// Drop the consumer registration. Safe to call when already detached.
    /// Returns whether a consumer was attached.
    pub fn detach(&self) -> bool {
        let previous = self.attachment.write().take();
        match previous {
            Some(old) => {
                info!(attachment_id = %old.id, "[Gateway] Consumer detached");
                true
            }
            None => {
                debug!("[Gateway] Detach requested with no consumer attached");
                false
            }
        }
    }

    /// Push a self-originated event to the consumer.
    pub fn push(&self, event: RelayEvent) -> PushOutcome {
        self.deliver_from(&self.app_id, event)
    }

    /// Deliver an event from `origin`. Foreign origins are rejected unless
    /// the attachment is exported.
    pub fn deliver_from(&self, origin: &str, event: RelayEvent) -> PushOutcome {
        // Resolve the target under the lock, dispatch outside it: a consumer
        // may attach or detach from inside `dispatch`. Attach swaps the whole
        // registration, so the clone is never half-detached.
        let consumer = {
            let guard = self.attachment.read();
            let Some(attachment) = guard.as_ref() else {
                trace!("[Gateway] No consumer attached, dropping {}", event.method);
                return PushOutcome::Detached;
            };

            if attachment.export == ReceiverExport::NotExported && origin != self.app_id {
                warn!(origin, "[Gateway] Rejected delivery from another application");
                return PushOutcome::Rejected;
            }
            attachment.consumer.clone()
        };

        match consumer.dispatch(event) {
            Ok(()) => PushOutcome::Delivered,
            Err(_) => PushOutcome::ConsumerGone,
        }
    }

    /// Serve a consumer request.
    pub async fn handle(&self, request: BridgeRequest) -> BridgeResponse {
        match request.method.as_str() {
            SCAN_ALL => self.scan_all().await,
            other => {
                debug!(method = other, "[Gateway] Method not implemented");
                BridgeResponse::NotImplemented
            }
        }
    }

    /// Serve a raw JSON request and return the JSON response.
    pub async fn handle_json(&self, raw: &str) -> String {
        let response = match serde_json::from_str::<BridgeRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "[Gateway] Malformed request");
                BridgeResponse::error(INVALID_REQUEST, "Request is not a valid bridge call")
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            error!(error = %e, "[Gateway] Failed to encode response");
            ENCODE_FAILURE.to_string()
        })
    }

    async fn scan_all(&self) -> BridgeResponse {
        let scan_lock = self.scan_lock.clone();
        let query = self.query.clone();

        // Waiting for a previous scan counts against the timeout. The guard
        // moves into the blocking task, so it is released when the store work
        // ends, not when this request gives up on it.
        let scan = async move {
            let guard = scan_lock.lock_owned().await;
            tokio::task::spawn_blocking(move || {
                let _scan = guard;
                query.scan_all()
            })
            .await
        };

        match tokio::time::timeout(self.scan_timeout, scan).await {
            Ok(Ok(records)) => {
                debug!(records = records.len(), "[Gateway] scanAll completed");
                BridgeResponse::success(records)
            }
            Ok(Err(e)) => {
                error!(error = %e, "[Gateway] scanAll task failed");
                BridgeResponse::error(SCAN_ERROR, "Failed to read message history")
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.scan_timeout.as_millis() as u64,
                    "[Gateway] scanAll timed out, returning empty result"
                );
                BridgeResponse::success(Vec::new())
            }
        }
    }
}
