//! # SmsBridge Core Library
//!
//! Domain types and the transport-facing half of the bridge.
//!
//! ## Modules
//!
//! - `branding` - Application identity and defaults
//! - `codec` - SMS PDU decoding (GSM 7-bit, UCS-2, user data headers)
//! - `config` - Bridge configuration (env, `.env`, JSON)
//! - `consumer` - Non-blocking hand-off channel to the consumer
//! - `domain` - Records, delivery batches, gateway wire protocol
//! - `error` - Error taxonomy
//! - `normalizer` - Fault-isolated batch decoding
//! - `store` - Message store abstraction

pub mod branding;
pub mod codec;
pub mod config;
pub mod consumer;
pub mod domain;
pub mod error;
pub mod normalizer;
pub mod store;

// Re-export commonly used types
pub use config::{BridgeConfig, LogConfig, ReceiverExport};
pub use consumer::{consumer_channel, ConsumerChannel, ConsumerReceiver, ConsumerSender, SharedConsumer};
pub use domain::*;
pub use error::{ChannelClosed, ConfigError, DecodeError, RowError, StoreError};
pub use normalizer::EventNormalizer;
pub use store::{InboxColumn, InboxQuery, MessageStore, RowStream, SortOrder, StoreRow, StoreValue};
