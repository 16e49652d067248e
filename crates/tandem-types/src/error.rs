//! Error taxonomy for gateway operations.
//!
//! Malformed stream frames are *not* errors -- the decoder discards them
//! silently and keeps reading. Budget inconsistencies are advisory signals
//! surfaced by the allocator's result, not errors either.

use thiserror::Error;

/// Errors from gateway HTTP and streaming operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connect/transport failure for a streaming or configuration call.
    /// Surfaced to the caller; never retried automatically.
    #[error("network error: {0}")]
    Network(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned HTTP {status}")]
    Http { status: u16 },

    /// A response that should carry a body did not.
    #[error("empty response body")]
    MissingBody,

    /// A configuration save failed upstream. Local edit state is not
    /// rolled back; the caller must re-fetch to discard unsaved edits.
    #[error("persistence error: {0}")]
    Persistence(String),
}
