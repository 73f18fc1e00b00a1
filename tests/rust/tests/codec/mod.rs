//! Codec integration tests
//!
//! PDU decoding and batch normalization.

mod normalizer;
