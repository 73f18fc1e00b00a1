//! End-to-end integration tests
//!
//! Full runtime: transport delivery in, consumer events out, history scans
//! answered over the same gateway.

mod runtime_lifecycle;
