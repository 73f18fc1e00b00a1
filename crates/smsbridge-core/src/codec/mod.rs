//! SMS PDU codec
//!
//! - `gsm7` - GSM 03.38 alphabet and septet packing
//! - `pdu` - SMS-DELIVER decoding into [`SmsDeliver`]

pub mod gsm7;
pub mod pdu;

pub use pdu::{decode, DataCoding, SmsDeliver};
