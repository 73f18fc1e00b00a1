//! SQLite implementation of MessageStore.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use smsbridge_core::{
    InboxColumn, InboxQuery, MessageStore, NormalizedRecord, RowStream, StoreError, StoreRow,
    StoreValue,
};
use tracing::{debug, warn};

use crate::Database;

/// Inbox table name
pub const INBOX_TABLE: &str = "sms_inbox";

/// Read permission granted to this process for the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    #[default]
    Granted,
    Denied,
}

/// SQLite-backed message store.
pub struct SqliteInboxStore {
    db: Arc<Mutex<Database>>,
    permission: RwLock<PermissionState>,
}

impl SqliteInboxStore {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self::with_permission(db, PermissionState::Granted)
    }

    pub fn with_permission(db: Arc<Mutex<Database>>, permission: PermissionState) -> Self {
        Self {
            db,
            permission: RwLock::new(permission),
        }
    }

    /// Current read permission. This is the status check callers use to tell
    /// an empty inbox from a denied one.
    pub fn permission(&self) -> PermissionState {
        *self.permission.read()
    }

    pub fn grant_read(&self) {
        *self.permission.write() = PermissionState::Granted;
    }

    pub fn revoke_read(&self) {
        *self.permission.write() = PermissionState::Denied;
    }

    /// Shared database handle
    pub fn database(&self) -> Arc<Mutex<Database>> {
        self.db.clone()
    }

    /// Insert a message into the inbox. Returns the row id.
    pub fn insert(&self, record: &NormalizedRecord) -> Result<i64> {
        let db = self.db.lock();
        let conn = db.connection();
        conn.execute(
            "INSERT INTO sms_inbox (address, body, date) VALUES (?1, ?2, ?3)",
            params![record.sender(), record.body(), record.timestamp_millis()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn to_value(value: ValueRef<'_>) -> StoreValue {
        match value {
            ValueRef::Null => StoreValue::Null,
            ValueRef::Integer(i) => StoreValue::Integer(i),
            ValueRef::Real(f) => StoreValue::Real(f),
            ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => StoreValue::Text(text.to_string()),
                Err(_) => StoreValue::Blob(bytes.to_vec()),
            },
            ValueRef::Blob(bytes) => StoreValue::Blob(bytes.to_vec()),
        }
    }

    /// Copy a row; a column that cannot be read ends the row early so the
    /// caller sees it as missing.
    fn read_row(row: &Row<'_>, width: usize) -> StoreRow {
        StoreRow::new(
            (0..width)
                .map_while(|i| row.get_ref(i).ok().map(Self::to_value))
                .collect(),
        )
    }
}

impl MessageStore for SqliteInboxStore {
    fn query_inbox(&self, query: &InboxQuery) -> Result<RowStream, StoreError> {
        if self.permission() == PermissionState::Denied {
            warn!("[InboxStore] Read permission denied");
            return Err(StoreError::PermissionDenied);
        }

        let columns = query
            .projection
            .iter()
            .map(InboxColumn::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns,
            INBOX_TABLE,
            query.order.as_sql()
        );

        let db = self.db.lock();
        let mut stmt = db
            .connection()
            .prepare(&sql)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let width = query.projection.len();
        let mut collected = Vec::new();
        loop {
            match rows.next() {
                Ok(Some(row)) => collected.push(Ok(Self::read_row(row, width))),
                Ok(None) => break,
                Err(e) => {
                    warn!("[InboxStore] Cursor failed after {} rows: {}", collected.len(), e);
                    collected.push(Err(StoreError::Cursor(e.to_string())));
                    break;
                }
            }
        }

        debug!("[InboxStore] Query returned {} rows", collected.len());
        Ok(Box::new(collected.into_iter()))
    }
}
