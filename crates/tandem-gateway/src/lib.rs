//! Gateway transport for the Tandem console.
//!
//! [`GatewayClient`] speaks the remote gateway's REST and streaming API;
//! [`sse`] decodes its chunked `data: ` frame protocol into content deltas.

pub mod client;
pub mod config;
pub mod sse;

pub use client::GatewayClient;
