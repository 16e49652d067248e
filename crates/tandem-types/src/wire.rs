//! Wire shapes for the gateway REST/streaming API.
//!
//! The streaming endpoint takes a linear user/assistant transcript plus the
//! target AI role; the context-config endpoints round-trip the budget
//! shapes in `crate::budget` with the gateway's snake_case field naming.

use serde::{Deserialize, Serialize};

use crate::budget::{CategoryAllocation, D5RecallConfig, InjectionConfig, VectorSearchConfig};
use crate::role::AiRole;

/// Role of a transcript turn as the gateway sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
    System,
}

/// A single turn in the outbound transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: WireRole,
    pub content: String,
}

impl WireMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: WireRole::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /gateway/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<WireMessage>,
    pub role: AiRole,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Token usage reported by the non-streaming chat endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response of the non-streaming chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub finish_reason: String,
    pub usage: ChatUsage,
}

/// Percentage allocation as returned by the config GET, including the
/// server-derived `reserved` share.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AllocationPayload {
    pub system_prompt: f64,
    pub core_context: f64,
    pub primary_content: f64,
    pub secondary_content: f64,
    pub d5_memory: f64,
    pub reserved: f64,
}

/// Per-layer token counts as precomputed by the gateway.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayerTokensPayload {
    pub system_prompt: u64,
    pub core_context: u64,
    pub primary_content: u64,
    pub secondary_content: u64,
    pub d5_memory: u64,
    pub reserved: u64,
}

/// Response of `GET /workflow/context-config/{role}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfigPayload {
    pub role: AiRole,
    pub total_budget: u64,
    pub allocation: AllocationPayload,
    pub layer_tokens: LayerTokensPayload,
    pub injection: InjectionPayload,
}

/// Injection settings as the gateway names them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InjectionPayload {
    pub message_interval: u32,
    pub token_threshold: u32,
}

impl From<InjectionPayload> for InjectionConfig {
    fn from(p: InjectionPayload) -> Self {
        Self {
            message_interval: p.message_interval,
            token_threshold: p.token_threshold,
        }
    }
}

/// Body of the legacy `PUT /workflow/context-config` save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfigUpdate {
    pub role: AiRole,
    pub total_budget: u64,
    pub system_prompt_pct: f64,
    pub core_context_pct: f64,
    pub primary_content_pct: f64,
    pub secondary_content_pct: f64,
    pub d5_memory_pct: f64,
    pub injection_message_interval: u32,
    pub injection_token_threshold: u32,
}

/// Body of the v2 `POST /workflow/context/config` save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfigV2Update {
    pub role: AiRole,
    pub total_budget: u64,
    pub reserve_ratio: f64,
    pub allocation: CategoryAllocation,
    pub vector_search: VectorSearchConfig,
    pub d5_recall: D5RecallConfig,
}
