//! Mock implementations for testing
//!
//! In-memory store and a synchronous consumer that records what it receives.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};

use smsbridge_core::{
    ChannelClosed, ConsumerChannel, InboxQuery, MessageStore, NormalizedRecord, RelayEvent,
    RowStream, StoreError, StoreRow, StoreValue,
};

// ============================================================================
// MockMessageStore
// ============================================================================

/// Store returning canned rows in insertion order.
#[derive(Default)]
pub struct MockMessageStore {
    rows: RwLock<Vec<Result<StoreRow, StoreError>>>,
    failure: RwLock<Option<StoreError>>,
    queries: RwLock<Vec<InboxQuery>>,
}

impl MockMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, sender: &str, body: &str, timestamp: i64) -> Self {
        self.with_row(vec![
            StoreValue::Text(sender.to_string()),
            StoreValue::Text(body.to_string()),
            StoreValue::Integer(timestamp),
        ])
    }

    pub fn with_row(self, values: Vec<StoreValue>) -> Self {
        self.rows.write().push(Ok(StoreRow::new(values)));
        self
    }

    /// Cursor error at this position
    pub fn with_cursor_error(self, message: &str) -> Self {
        self.rows
            .write()
            .push(Err(StoreError::Cursor(message.to_string())));
        self
    }

    /// Fail every query with `error`
    pub fn failing(self, error: StoreError) -> Self {
        *self.failure.write() = Some(error);
        self
    }

    pub fn denied() -> Self {
        Self::new().failing(StoreError::PermissionDenied)
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<InboxQuery> {
        self.queries.read().clone()
    }
}

impl MessageStore for MockMessageStore {
    fn query_inbox(&self, query: &InboxQuery) -> Result<RowStream, StoreError> {
        self.queries.write().push(query.clone());
        if let Some(error) = self.failure.read().clone() {
            return Err(error);
        }
        Ok(Box::new(self.rows.read().clone().into_iter()))
    }
}

// ============================================================================
// RecordingConsumer
// ============================================================================

/// Consumer that records every dispatched event; can be closed to simulate a
/// torn-down surface.
#[derive(Default)]
pub struct RecordingConsumer {
    events: Mutex<Vec<RelayEvent>>,
    dispatches: AtomicUsize,
    closed: RwLock<bool>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        *self.closed.write() = true;
    }

    pub fn events(&self) -> Vec<RelayEvent> {
        self.events.lock().clone()
    }

    pub fn payloads(&self) -> Vec<NormalizedRecord> {
        self.events().into_iter().map(|e| e.payload).collect()
    }

    /// Dispatch attempts, including ones refused after `close`
    pub fn dispatch_count(&self) -> usize {
        self.dispatches.load(Ordering::SeqCst)
    }
}

impl ConsumerChannel for RecordingConsumer {
    fn dispatch(&self, event: RelayEvent) -> Result<(), ChannelClosed> {
        self.dispatches.fetch_add(1, Ordering::SeqCst);
        if *self.closed.read() {
            return Err(ChannelClosed);
        }
        self.events.lock().push(event);
        Ok(())
    }
}
