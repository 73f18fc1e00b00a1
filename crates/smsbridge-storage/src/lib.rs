//! SmsBridge Storage Layer
//!
//! SQLite-backed message history.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   QueryBridge                        │
//! ├──────────────────────────────────────────────────────┤
//! │          MessageStore trait (smsbridge-core)         │
//! ├──────────────────────────────────────────────────────┤
//! │     SqliteInboxStore (read permission gate)          │
//! ├──────────────────────────────────────────────────────┤
//! │                   Database                           │
//! │                   (SQLite)                           │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use smsbridge_storage::{Database, SqliteInboxStore};
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//!
//! let db = Arc::new(Mutex::new(Database::open(&path)?));
//! let store = SqliteInboxStore::new(db);
//! ```

mod database;
mod inbox_store;

pub use database::Database;
pub use inbox_store::{PermissionState, SqliteInboxStore, INBOX_TABLE};
