//! Domain types
//!
//! - `NormalizedRecord` - the canonical message shape on both push and pull paths
//! - `RawDeliveryBatch` / `TransportEvent` - what the transport hands us
//! - `BridgeRequest` / `BridgeResponse` / `RelayEvent` - the gateway wire protocol

mod bridge;
mod delivery;
mod record;

pub use bridge::{
    BridgeError, BridgeRequest, BridgeResponse, RelayEvent, INVALID_REQUEST, ON_EVENT_RECEIVED,
    SCAN_ALL, SCAN_ERROR,
};
pub use delivery::{PduFormat, RawDeliveryBatch, TransportEvent};
pub use record::NormalizedRecord;
