//! Stream frame decoder for the gateway's chunked chat responses.
//!
//! The gateway answers a streaming chat request with newline-separated
//! frames of the form `data: <json>`, terminated by `data: [DONE]`. Each
//! JSON payload may carry a string `content` field; those values are the
//! deltas.
//!
//! Frames are scanned per network chunk with no cross-chunk buffering:
//! a payload split across two physical chunks fails to parse and is
//! silently dropped. Malformed frames never abort the remaining stream.

use futures_util::{Stream, StreamExt};
use tracing::trace;

use tandem_types::error::GatewayError;

/// Marker a relevant frame starts with.
pub const DATA_PREFIX: &str = "data: ";

/// The only normal-termination sentinel.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Extract the payload of a frame line, if it is one.
fn frame_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

/// Parse a frame payload into a content delta.
///
/// Returns `None` for anything that is not a JSON object with a non-empty
/// string `content` field; the caller discards those frames silently.
fn delta_from_payload(payload: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(payload).ok()?;
    match value.get("content") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Decode a chunked response body into a lazy sequence of content deltas.
///
/// The sequence is finite (bounded by `[DONE]` or stream close), forward
/// only, and not restartable. Transport errors surface as one
/// [`GatewayError::Network`] item and end the sequence. A consumer that
/// stops pulling simply leaves the transport's remaining bytes undrained;
/// no buffering bound is imposed here.
pub fn decode_frames<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, GatewayError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        futures_util::pin_mut!(chunks);
        while let Some(next) = chunks.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(GatewayError::Network(e.to_string()));
                    return;
                }
            };
            let text = String::from_utf8_lossy(chunk.as_ref());
            for line in text.split('\n') {
                let Some(payload) = frame_payload(line) else {
                    continue;
                };
                if payload == DONE_SENTINEL {
                    return;
                }
                match delta_from_payload(payload) {
                    Some(delta) => yield Ok(delta),
                    None => trace!(frame = payload, "discarding unparsable frame"),
                }
            }
        }
    }
}
