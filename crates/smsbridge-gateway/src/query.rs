//! QueryBridge - bulk read of message history
//!
//! `scan_all` never fails. A store that is missing or refuses access yields
//! an empty result, indistinguishable from an empty inbox. Callers that must
//! tell the two apart check the store's permission status separately.

use std::sync::Arc;

use smsbridge_core::{InboxQuery, MessageStore, NormalizedRecord, RowError, StoreRow};
use tracing::{debug, error, info, warn};

const SENDER: usize = 0;
const BODY: usize = 1;
const DATE: usize = 2;

/// Reads the full history from a [`MessageStore`], newest first.
pub struct QueryBridge {
    store: Arc<dyn MessageStore>,
}

impl QueryBridge {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Read every record the store will give us. Blocking.
    ///
    /// Unreadable rows are skipped. A cursor failure mid-scan keeps the rows
    /// already read.
    pub fn scan_all(&self) -> Vec<NormalizedRecord> {
        let rows = match self.store.query_inbox(&InboxQuery::newest_first()) {
            Ok(rows) => rows,
            Err(e) => {
                error!("[QueryBridge] Error scanning messages: {}", e);
                return Vec::new();
            }
        };

        let mut skipped = 0usize;
        let records: Vec<NormalizedRecord> = rows
            .map_while(|row| {
                row.map_err(|e| {
                    warn!(error = %e, "[QueryBridge] Cursor failed, keeping rows read so far");
                })
                .ok()
            })
            .filter_map(|row| match extract(&row) {
                Ok(record) => Some(record),
                Err(e) => {
                    skipped += 1;
                    debug!(error = %e, "[QueryBridge] Skipping unreadable row");
                    None
                }
            })
            .collect();

        info!(
            records = records.len(),
            skipped, "[QueryBridge] Scan complete"
        );
        records
    }
}

fn extract(row: &StoreRow) -> Result<NormalizedRecord, RowError> {
    Ok(NormalizedRecord::from_parts(
        row.text(SENDER)?,
        row.text(BODY)?,
        row.integer(DATE)?,
    ))
}
