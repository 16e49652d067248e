//! Conversation message types for the dual-channel chat store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::MessageSource;

/// Optional metadata attached to a message.
///
/// Defense fields come from the gateway's pipeline checks; `token_count`
/// is a caller-supplied estimate (the console never counts tokens itself).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defense_passed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
}

/// A single message in one AI role's channel.
///
/// `content` is the display text and never carries a sender prefix.
/// `raw_content`, when present, is the text as actually sent to the model
/// and may carry a prefix such as `"Human users: "`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub source: MessageSource,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub is_streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

/// The caller-supplied part of a message; id and timestamp are assigned
/// by the store on append.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub source: MessageSource,
    pub content: String,
    pub raw_content: Option<String>,
    pub is_streaming: bool,
    pub metadata: Option<MessageMetadata>,
}

impl MessageDraft {
    /// A finalized (non-streaming) message from the given source.
    pub fn new(source: MessageSource, content: impl Into<String>) -> Self {
        Self {
            source,
            content: content.into(),
            raw_content: None,
            is_streaming: false,
            metadata: None,
        }
    }

    /// An empty streaming placeholder for an AI response.
    pub fn streaming_placeholder(source: MessageSource) -> Self {
        Self {
            source,
            content: String::new(),
            raw_content: None,
            is_streaming: true,
            metadata: None,
        }
    }

    pub fn with_raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
