//! Message store abstraction
//!
//! The store is the external source of message history. Implementations hand
//! back rows of dynamically typed values; turning a row into a record is the
//! caller's job, so a single bad row can be skipped without failing the scan.

use crate::error::{RowError, StoreError};

/// A single dynamically typed column value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl StoreValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

/// One row in projection order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoreRow {
    values: Vec<StoreValue>,
}

impl StoreRow {
    pub fn new(values: Vec<StoreValue>) -> Self {
        Self { values }
    }

    fn value(&self, column: usize) -> Result<&StoreValue, RowError> {
        self.values
            .get(column)
            .ok_or(RowError::MissingColumn(column))
    }

    /// Read a column as text. Null reads as `None`; numbers are stringified.
    pub fn text(&self, column: usize) -> Result<Option<String>, RowError> {
        match self.value(column)? {
            StoreValue::Null => Ok(None),
            StoreValue::Text(s) => Ok(Some(s.clone())),
            StoreValue::Integer(i) => Ok(Some(i.to_string())),
            StoreValue::Real(f) => Ok(Some(f.to_string())),
            other => Err(RowError::TypeMismatch {
                column,
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    /// Read a column as an integer. Null reads as 0; reals are truncated.
    pub fn integer(&self, column: usize) -> Result<i64, RowError> {
        let mismatch = |found: &StoreValue| RowError::TypeMismatch {
            column,
            expected: "integer",
            found: found.kind(),
        };
        let value = self.value(column)?;
        match value {
            StoreValue::Null => Ok(0),
            StoreValue::Integer(i) => Ok(*i),
            StoreValue::Real(f) if f.is_finite() => Ok(*f as i64),
            StoreValue::Text(s) => s.trim().parse().map_err(|_| mismatch(value)),
            other => Err(mismatch(other)),
        }
    }
}

/// Columns of the inbox the bridge may project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxColumn {
    Address,
    Body,
    Date,
}

impl InboxColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Body => "body",
            Self::Date => "date",
        }
    }
}

/// Ordering hint; ties are store-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDescending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::DateDescending => "date DESC",
        }
    }
}

/// Inbox query: projection plus ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxQuery {
    pub projection: Vec<InboxColumn>,
    pub order: SortOrder,
}

impl InboxQuery {
    /// `address, body, date` newest first.
    pub fn newest_first() -> Self {
        Self {
            projection: vec![InboxColumn::Address, InboxColumn::Body, InboxColumn::Date],
            order: SortOrder::DateDescending,
        }
    }
}

/// Row iterator returned by a store. An `Err` item ends the stream.
pub type RowStream = Box<dyn Iterator<Item = Result<StoreRow, StoreError>> + Send>;

/// Source of message history.
///
/// Calls are blocking. Implementations fail the whole query with a
/// [`StoreError`] when access is denied or the source is missing.
pub trait MessageStore: Send + Sync {
    fn query_inbox(&self, query: &InboxQuery) -> Result<RowStream, StoreError>;
}
