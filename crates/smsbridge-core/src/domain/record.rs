use serde::{Deserialize, Serialize};

/// A single normalized text message.
///
/// Produced per delivered unit on the push path and per store row on the
/// pull path. Both paths serialize to the same `{sender, body, timestamp}`
/// mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedRecord {
    sender: String,
    body: String,
    #[serde(rename = "timestamp")]
    timestamp_millis: i64,
}

impl NormalizedRecord {
    pub fn new(sender: impl Into<String>, body: impl Into<String>, timestamp_millis: i64) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            timestamp_millis,
        }
    }

    /// Build a record from optional fields; absent text becomes empty.
    pub fn from_parts(sender: Option<String>, body: Option<String>, timestamp_millis: i64) -> Self {
        Self::new(
            sender.unwrap_or_default(),
            body.unwrap_or_default(),
            timestamp_millis,
        )
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Platform epoch milliseconds; 0 when unavailable.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }

    /// String-keyed mapping handed to the consumer.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "sender": self.sender,
            "body": self.body,
            "timestamp": self.timestamp_millis,
        })
    }
}
