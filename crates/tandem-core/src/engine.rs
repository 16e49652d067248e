//! Streaming turn engine for the dual-channel conversation.
//!
//! Composes the prefixer, the store, and an injected stream client into
//! one turn: rebuild the transcript, send the prefixed user turn, then
//! pump decoded deltas into a placeholder message until the stream ends.
//!
//! Deltas for one message id are applied in decode order. Turns for the
//! two roles keep disjoint ids and disjoint channels, so two in-flight
//! streams may interleave arbitrarily without corrupting each other.
//! There is no forced-abort primitive and no backpressure bound: a caller
//! that stops pulling simply leaves the transport's buffered bytes
//! undrained.

use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use tracing::debug;
use uuid::Uuid;

use tandem_types::error::GatewayError;
use tandem_types::message::{MessageDraft, MessageMetadata};
use tandem_types::role::{AiRole, SenderRole};
use tandem_types::wire::{ChatRequest, WireMessage};

use crate::prefix::{apply_prefix, prefix_outbound};
use crate::store::DualChannelStore;

/// A finite, forward-only sequence of content deltas. Not restartable;
/// replay requires a new request.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, GatewayError>> + Send + 'static>>;

/// Seam between the turn engine and the gateway transport.
///
/// Implementations live in tandem-gateway; tests script the stream with
/// `futures_util::stream::iter`. The stream is boxed so the session can
/// hold any client behind one type.
pub trait ChatStreamClient: Send + Sync {
    /// Open a streaming chat request and return the delta sequence.
    fn stream_chat(
        &self,
        request: ChatRequest,
    ) -> impl std::future::Future<Output = Result<DeltaStream, GatewayError>> + Send;
}

/// Per-turn model parameters forwarded to the gateway.
#[derive(Debug, Clone, Default)]
pub struct TurnOptions {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
}

/// One operator's view of both AI channels plus the client that feeds them.
pub struct DualChatSession<C> {
    store: DualChannelStore,
    client: C,
    options: TurnOptions,
}

impl<C: ChatStreamClient> DualChatSession<C> {
    pub fn new(client: C) -> Self {
        Self {
            store: DualChannelStore::new(),
            client,
            options: TurnOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TurnOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &DualChannelStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DualChannelStore {
        &mut self.store
    }

    /// Rebuild the linear transcript for a role from finalized messages.
    ///
    /// The channel owner's messages become assistant turns; every other
    /// source becomes a user turn, preferring `raw_content` (which carries
    /// the speaker marker) over the display text.
    pub fn transcript(&self, role: AiRole) -> Vec<WireMessage> {
        self.store
            .messages(role)
            .iter()
            .filter(|m| !m.is_streaming)
            .map(|m| {
                let content = m.raw_content.clone().unwrap_or_else(|| m.content.clone());
                if m.source.is_assistant_for(role) {
                    WireMessage::assistant(content)
                } else {
                    WireMessage::user(content)
                }
            })
            .collect()
    }

    /// Send one turn to a role and stream the response into its channel.
    pub async fn send(
        &mut self,
        role: AiRole,
        sender: SenderRole,
        content: &str,
    ) -> Result<Uuid, GatewayError> {
        self.send_with(role, sender, content, |_| {}).await
    }

    /// Like [`send`](Self::send), invoking `on_delta` for each decoded
    /// fragment (used by the CLI to print while streaming).
    pub async fn send_with(
        &mut self,
        role: AiRole,
        sender: SenderRole,
        content: &str,
        mut on_delta: impl FnMut(&str),
    ) -> Result<Uuid, GatewayError> {
        let mut messages = self.transcript(role);
        let outbound = prefix_outbound(&[WireMessage::user(content)], sender);
        messages.extend(outbound);

        self.store.append(
            role,
            apply_prefix(MessageDraft::new(sender.into(), content), sender),
        );
        let reply_id = self
            .store
            .append(role, MessageDraft::streaming_placeholder(role.into()));

        let request = ChatRequest {
            messages,
            role,
            stream: true,
            model: self.options.model.clone(),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        debug!(role = %role, sender = %sender, "opening chat stream");
        let mut stream = match self.client.stream_chat(request).await {
            Ok(stream) => stream,
            Err(e) => {
                self.store
                    .update_content(role, reply_id, format!("Error: {e}"));
                self.store.set_streaming(role, reply_id, false);
                return Err(e);
            }
        };

        let mut full = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(delta) => {
                    full.push_str(&delta);
                    on_delta(&delta);
                    self.store.update_content(role, reply_id, full.clone());
                }
                Err(e) => {
                    self.store
                        .update_content(role, reply_id, format!("Error: {e}"));
                    self.store.set_streaming(role, reply_id, false);
                    return Err(e);
                }
            }
        }

        self.store.set_streaming(role, reply_id, false);
        debug!(role = %role, chars = full.len(), "chat stream finished");
        Ok(reply_id)
    }

    /// Announce a system event in both channels.
    pub fn broadcast_system(&mut self, content: &str, metadata: Option<MessageMetadata>) {
        self.store.broadcast_system(content, metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use futures_util::stream;
    use tandem_types::role::MessageSource;
    use tandem_types::wire::WireRole;

    /// Scripted client: each call pops the next canned delta sequence and
    /// records the request it was given.
    struct MockClient {
        scripts: Mutex<VecDeque<Vec<Result<String, GatewayError>>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl MockClient {
        fn new(scripts: Vec<Vec<Result<String, GatewayError>>>) -> Self {
            Self {
                scripts: Mutex::new(scripts.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn ok(deltas: &[&str]) -> Vec<Result<String, GatewayError>> {
            deltas.iter().map(|d| Ok(d.to_string())).collect()
        }
    }

    impl ChatStreamClient for MockClient {
        async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, GatewayError> {
            self.requests.lock().unwrap().push(request);
            let script = self
                .scripts
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(GatewayError::MissingBody)?;
            Ok(Box::pin(stream::iter(script)))
        }
    }

    #[tokio::test]
    async fn test_send_accumulates_and_finalizes() {
        let client = MockClient::new(vec![MockClient::ok(&["Hel", "lo", " there"])]);
        let mut session = DualChatSession::new(client);

        let id = session
            .send(AiRole::Executor, SenderRole::Human, "hi")
            .await
            .unwrap();

        let messages = session.store().messages(AiRole::Executor);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].source, MessageSource::Human);
        assert_eq!(messages[0].content, "hi");
        assert_eq!(messages[0].raw_content.as_deref(), Some("Human users: hi"));
        assert_eq!(messages[1].id, id);
        assert_eq!(messages[1].content, "Hello there");
        assert!(!messages[1].is_streaming);
    }

    #[tokio::test]
    async fn test_transcript_maps_roles_and_prefers_raw_content() {
        let client = MockClient::new(vec![
            MockClient::ok(&["first reply"]),
            MockClient::ok(&["second reply"]),
        ]);
        let mut session = DualChatSession::new(client);

        session
            .send(AiRole::Executor, SenderRole::Human, "question one")
            .await
            .unwrap();
        session
            .send(AiRole::Executor, SenderRole::Commander, "follow up")
            .await
            .unwrap();

        let requests = session.client.requests.lock().unwrap();
        let second = &requests[1];
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[0].role, WireRole::User);
        assert_eq!(second.messages[0].content, "Human users: question one");
        assert_eq!(second.messages[1].role, WireRole::Assistant);
        assert_eq!(second.messages[1].content, "first reply");
        assert_eq!(second.messages[2].content, "AI Commander: follow up");
    }

    #[tokio::test]
    async fn test_streaming_placeholder_excluded_from_transcript() {
        let client = MockClient::new(vec![MockClient::ok(&["x"])]);
        let mut session = DualChatSession::new(client);

        session
            .store_mut()
            .append(AiRole::Auditor, MessageDraft::streaming_placeholder(MessageSource::Auditor));
        session
            .send(AiRole::Auditor, SenderRole::Human, "review this")
            .await
            .unwrap();

        let requests = session.client.requests.lock().unwrap();
        // Only the new prefixed user turn; the unfinished placeholder is skipped.
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].content, "Human users: review this");
    }

    #[tokio::test]
    async fn test_stream_error_recorded_and_finalized() {
        let client = MockClient::new(vec![vec![
            Ok("partial".to_string()),
            Err(GatewayError::Network("connection reset".to_string())),
        ]]);
        let mut session = DualChatSession::new(client);

        let result = session.send(AiRole::Executor, SenderRole::Human, "hi").await;
        assert!(result.is_err());

        let messages = session.store().messages(AiRole::Executor);
        let reply = &messages[1];
        assert!(reply.content.contains("connection reset"));
        assert!(!reply.is_streaming);
    }

    #[tokio::test]
    async fn test_interleaved_streams_no_cross_contamination() {
        // Two concurrent role streams applied to one store in alternating
        // order must accumulate independently.
        let mut store = DualChannelStore::new();
        let executor_id = store.append(
            AiRole::Executor,
            MessageDraft::streaming_placeholder(MessageSource::Executor),
        );
        let auditor_id = store.append(
            AiRole::Auditor,
            MessageDraft::streaming_placeholder(MessageSource::Auditor),
        );

        let mut exec_stream = stream::iter(MockClient::ok(&["E1 ", "E2 ", "E3"]));
        let mut audit_stream = stream::iter(MockClient::ok(&["A1 ", "A2 ", "A3"]));
        let mut exec_full = String::new();
        let mut audit_full = String::new();

        for _ in 0..3 {
            let delta = exec_stream.next().await.unwrap().unwrap();
            exec_full.push_str(&delta);
            store.update_content(AiRole::Executor, executor_id, exec_full.clone());

            let delta = audit_stream.next().await.unwrap().unwrap();
            audit_full.push_str(&delta);
            store.update_content(AiRole::Auditor, auditor_id, audit_full.clone());
        }
        store.set_streaming(AiRole::Executor, executor_id, false);
        store.set_streaming(AiRole::Auditor, auditor_id, false);

        assert_eq!(store.messages(AiRole::Executor)[0].content, "E1 E2 E3");
        assert_eq!(store.messages(AiRole::Auditor)[0].content, "A1 A2 A3");
    }

    #[tokio::test]
    async fn test_open_failure_records_error() {
        // Empty script queue -> stream_chat fails before any delta.
        let client = MockClient::new(vec![]);
        let mut session = DualChatSession::new(client);

        let result = session.send(AiRole::Auditor, SenderRole::Human, "hi").await;
        assert!(result.is_err());

        let messages = session.store().messages(AiRole::Auditor);
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.starts_with("Error:"));
        assert!(!messages[1].is_streaming);
    }
}
