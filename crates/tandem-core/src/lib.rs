//! Core logic for the Tandem console.
//!
//! Pure budget allocation, speaker prefixing, the dual-channel message
//! store, and the streaming turn engine. No I/O lives here; the gateway
//! client is injected through the [`engine::ChatStreamClient`] seam.

pub mod budget;
pub mod engine;
pub mod prefix;
pub mod store;
