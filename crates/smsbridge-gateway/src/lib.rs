//! SmsBridge Gateway
//!
//! Application-side half of the bridge:
//! - `receiver` - transport entry point, one delivery at a time
//! - `relay` - one push per normalized record
//! - `query` - fault-tolerant history scan
//! - `gateway` - consumer attachment and request dispatch
//! - `runtime` - lifecycle owner wiring the above together
//! - `logging` - tracing subscriber setup

pub mod gateway;
pub mod logging;
pub mod query;
pub mod receiver;
pub mod relay;
pub mod runtime;

pub use gateway::{AttachmentState, BridgeGateway, PushOutcome};
pub use query::QueryBridge;
pub use receiver::SmsReceiver;
pub use relay::Relay;
pub use runtime::BridgeRuntime;
