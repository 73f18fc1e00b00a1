//! Error types shared across the bridge
//!
//! Every error here is recovered at a component boundary; none of them
//! crosses the push path or the query path unconverted.

use thiserror::Error;

/// Failure to decode a single delivery unit (PDU).
///
/// Recovered by the normalizer: the unit is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unsupported PDU format: {0}")]
    UnsupportedFormat(String),

    #[error("PDU truncated while reading {0}")]
    Truncated(&'static str),

    #[error("unsupported message type indicator {0:#04b}")]
    UnsupportedMessageType(u8),

    #[error("compressed user data is not supported")]
    CompressedText,

    #[error("invalid service centre timestamp")]
    InvalidTimestamp,

    #[error("invalid UCS-2 user data")]
    InvalidUcs2,

    #[error("invalid hex unit: {0}")]
    InvalidHex(String),
}

/// Store-level failure. Recovered by the query bridge as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("read permission denied")]
    PermissionDenied,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("cursor failed: {0}")]
    Cursor(String),
}

/// Failure to extract a single store row. Recovered by skipping the row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing column {0}")]
    MissingColumn(usize),

    #[error("column {column} holds {found}, expected {expected}")]
    TypeMismatch {
        column: usize,
        expected: &'static str,
        found: &'static str,
    },
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The consumer side of a channel has gone away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("consumer channel closed")]
pub struct ChannelClosed;
