//! HTTP client for the remote gateway.
//!
//! Authenticates with an `X-API-Key` header; the key is wrapped in
//! [`secrecy::SecretString`] and never appears in Debug output or logs.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use tandem_core::engine::{ChatStreamClient, DeltaStream};
use tandem_types::error::GatewayError;
use tandem_types::wire::{ChatRequest, ChatResponse};

use crate::sse::decode_frames;

/// Client for the gateway's chat and configuration endpoints.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl GatewayClient {
    const API_KEY_HEADER: &'static str = "X-API-Key";

    /// Create a new gateway client.
    ///
    /// A trailing slash on `base_url` is trimmed so endpoint paths can be
    /// joined verbatim.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(300)) // 5 min timeout for long generations
            .build()
            .expect("failed to create reqwest client");
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            api_key,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub(crate) fn authed_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(self.url(path))
            .header(Self::API_KEY_HEADER, self.api_key.expose_secret())
    }

    pub(crate) fn authed_get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.url(path))
            .header(Self::API_KEY_HEADER, self.api_key.expose_secret())
    }

    pub(crate) fn authed_put(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .put(self.url(path))
            .header(Self::API_KEY_HEADER, self.api_key.expose_secret())
    }

    /// Non-streaming chat completion.
    pub async fn chat(&self, mut request: ChatRequest) -> Result<ChatResponse, GatewayError> {
        request.stream = false;
        let response = self
            .authed_post("/gateway/chat")
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Http {
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))
    }

    /// Open a streaming chat request and decode its frames into deltas.
    pub async fn open_stream(&self, request: ChatRequest) -> Result<DeltaStream, GatewayError> {
        debug!(role = %request.role, turns = request.messages.len(), "POST /gateway/chat (stream)");
        let response = self
            .authed_post("/gateway/chat")
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GatewayError::Http {
                status: response.status().as_u16(),
            });
        }
        Ok(Box::pin(decode_frames(response.bytes_stream())))
    }
}

impl ChatStreamClient for GatewayClient {
    async fn stream_chat(&self, mut request: ChatRequest) -> Result<DeltaStream, GatewayError> {
        request.stream = true;
        self.open_stream(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GatewayClient {
        GatewayClient::new(base, SecretString::from("test-key"))
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let c = client("http://localhost:22888/");
        assert_eq!(c.base_url(), "http://localhost:22888");
        assert_eq!(
            c.url("/gateway/chat"),
            "http://localhost:22888/gateway/chat"
        );
    }

    #[test]
    fn test_url_joining_without_slash() {
        let c = client("http://gateway.internal/api/b2");
        assert_eq!(
            c.url("/workflow/context-config/executor"),
            "http://gateway.internal/api/b2/workflow/context-config/executor"
        );
    }
}
