//! Dual-channel message store.
//!
//! Two independent, append-only, id-addressed message sequences, one per
//! AI role. The streaming consumer mutates messages in place by id as
//! deltas arrive. The channels share no state: clearing or streaming into
//! one never touches the other.
//!
//! Per streamed message the lifecycle is
//! `created(is_streaming=true, content="") -> accumulating -> finalized`,
//! and a finalized message never re-enters the streaming state.

use chrono::Utc;
use uuid::Uuid;

use tandem_types::message::{ConversationMessage, MessageDraft, MessageMetadata};
use tandem_types::role::{AiRole, MessageSource};

use crate::prefix::SYSTEM_PREFIX;

/// One AI role's ordered message history.
#[derive(Debug, Default)]
struct Channel {
    messages: Vec<ConversationMessage>,
}

impl Channel {
    fn append(&mut self, draft: MessageDraft) -> Uuid {
        let id = Uuid::now_v7();
        self.messages.push(ConversationMessage {
            id,
            source: draft.source,
            content: draft.content,
            raw_content: draft.raw_content,
            timestamp: Utc::now(),
            is_streaming: draft.is_streaming,
            metadata: draft.metadata,
        });
        id
    }

    fn update_content(&mut self, id: Uuid, content: String) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
            msg.content = content;
        }
    }

    fn set_streaming(&mut self, id: Uuid, streaming: bool) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
            // Finalized is terminal.
            if !msg.is_streaming && streaming {
                return;
            }
            msg.is_streaming = streaming;
        }
    }

    fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Two independent message channels keyed by AI role.
#[derive(Debug, Default)]
pub struct DualChannelStore {
    executor: Channel,
    auditor: Channel,
}

impl DualChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, role: AiRole) -> &Channel {
        match role {
            AiRole::Executor => &self.executor,
            AiRole::Auditor => &self.auditor,
        }
    }

    fn channel_mut(&mut self, role: AiRole) -> &mut Channel {
        match role {
            AiRole::Executor => &mut self.executor,
            AiRole::Auditor => &mut self.auditor,
        }
    }

    /// Append a message to the role's channel, assigning a fresh id and
    /// creation timestamp. Returns the id for later mutation.
    pub fn append(&mut self, role: AiRole, draft: MessageDraft) -> Uuid {
        self.channel_mut(role).append(draft)
    }

    /// Replace the content of the message with this id; no-op when the id
    /// is unknown. Used to apply accumulated streaming text.
    pub fn update_content(&mut self, role: AiRole, id: Uuid, content: impl Into<String>) {
        self.channel_mut(role).update_content(id, content.into());
    }

    /// Set the streaming flag. Finalization (`false`) happens exactly once
    /// per streamed message; a finalized message stays finalized.
    pub fn set_streaming(&mut self, role: AiRole, id: Uuid, streaming: bool) {
        self.channel_mut(role).set_streaming(id, streaming);
    }

    /// Empty one channel; the other is unaffected.
    pub fn clear(&mut self, role: AiRole) {
        self.channel_mut(role).clear();
    }

    /// Append a system-sourced announcement to both channels.
    ///
    /// The two copies are logically identical but get distinct ids. The
    /// stored `raw_content` carries the system prefix so resending the
    /// history keeps the speaker marker.
    pub fn broadcast_system(
        &mut self,
        content: &str,
        metadata: Option<MessageMetadata>,
    ) -> (Uuid, Uuid) {
        let draft = |meta: Option<MessageMetadata>| {
            let mut d = MessageDraft::new(MessageSource::System, content)
                .with_raw_content(format!("{SYSTEM_PREFIX}{content}"));
            d.metadata = meta;
            d
        };
        let executor_id = self.executor.append(draft(metadata.clone()));
        let auditor_id = self.auditor.append(draft(metadata));
        (executor_id, auditor_id)
    }

    /// The role's messages in append order.
    pub fn messages(&self, role: AiRole) -> &[ConversationMessage] {
        &self.channel(role).messages
    }

    pub fn len(&self, role: AiRole) -> usize {
        self.channel(role).messages.len()
    }

    pub fn is_empty(&self, role: AiRole) -> bool {
        self.channel(role).messages.is_empty()
    }
}
