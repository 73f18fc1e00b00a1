use serde::{Deserialize, Serialize};

use super::NormalizedRecord;

/// Consumer request: bulk read of message history
pub const SCAN_ALL: &str = "scanAll";

/// Push method carrying a newly received message
pub const ON_EVENT_RECEIVED: &str = "onEventReceived";

/// Error code for a scan that failed inside the bridge
pub const SCAN_ERROR: &str = "SCAN_ERROR";

/// Error code for a request that could not be parsed
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";

/// Request from the consumer. Only `scanAll` is defined; anything else is
/// answered with [`BridgeResponse::NotImplemented`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeRequest {
    pub method: String,
}

impl BridgeRequest {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
        }
    }

    pub fn scan_all() -> Self {
        Self::new(SCAN_ALL)
    }
}

/// Named error crossing the gateway. Short code plus human-readable message,
/// never internal diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeError {
    pub code: String,
    pub message: String,
}

impl BridgeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Gateway response to a [`BridgeRequest`].
///
/// Wire shape:
/// - `{"status":"success","result":[...]}`
/// - `{"status":"error","code":"...","message":"..."}`
/// - `{"status":"notImplemented"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum BridgeResponse {
    Success { result: Vec<NormalizedRecord> },
    Error(BridgeError),
    /// Unknown method. Not an error: consumers probe capabilities with it.
    NotImplemented,
}

impl BridgeResponse {
    pub fn success(result: Vec<NormalizedRecord>) -> Self {
        Self::Success { result }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(BridgeError::new(code, message))
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented)
    }

    /// Records of a successful response, if any.
    pub fn records(&self) -> Option<&[NormalizedRecord]> {
        match self {
            Self::Success { result } => Some(result),
            _ => None,
        }
    }
}

/// Fire-and-forget push to the consumer. No response, no acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEvent {
    pub method: String,
    pub payload: NormalizedRecord,
}

impl RelayEvent {
    /// Event for a freshly received message.
    pub fn received(payload: NormalizedRecord) -> Self {
        Self {
            method: ON_EVENT_RECEIVED.to_string(),
            payload,
        }
    }
}
