//! Role enums for the dual-AI console.
//!
//! Three closed sets: the two AI roles a channel can belong to, the three
//! non-assistant senders that may author a transcript turn, and the union
//! of both as a message source tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two AI roles operated through the gateway.
///
/// Each role owns its own message channel and its own budget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiRole {
    Executor,
    Auditor,
}

impl AiRole {
    /// Display label for console output.
    pub fn label(&self) -> &'static str {
        match self {
            AiRole::Executor => "Executor",
            AiRole::Auditor => "Auditor",
        }
    }
}

impl fmt::Display for AiRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiRole::Executor => write!(f, "executor"),
            AiRole::Auditor => write!(f, "auditor"),
        }
    }
}

impl FromStr for AiRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "executor" => Ok(AiRole::Executor),
            "auditor" => Ok(AiRole::Auditor),
            other => Err(format!("invalid ai role: '{other}'")),
        }
    }
}

/// A non-assistant speaker in a transcript.
///
/// The gateway sees one linear user/assistant transcript; these senders are
/// distinguished by a literal text prefix applied to their turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Human,
    Commander,
    System,
}

impl fmt::Display for SenderRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderRole::Human => write!(f, "human"),
            SenderRole::Commander => write!(f, "commander"),
            SenderRole::System => write!(f, "system"),
        }
    }
}

impl FromStr for SenderRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(SenderRole::Human),
            "commander" => Ok(SenderRole::Commander),
            "system" => Ok(SenderRole::System),
            other => Err(format!("invalid sender role: '{other}'")),
        }
    }
}

/// Who authored a message in a channel: one of the non-assistant senders
/// or one of the two AI roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    Human,
    Commander,
    System,
    Executor,
    Auditor,
}

impl MessageSource {
    /// Whether this source is the AI that owns the given channel.
    ///
    /// Only the owning AI's messages map to `assistant` turns when a
    /// transcript is rebuilt for the gateway.
    pub fn is_assistant_for(&self, role: AiRole) -> bool {
        matches!(
            (self, role),
            (MessageSource::Executor, AiRole::Executor)
                | (MessageSource::Auditor, AiRole::Auditor)
        )
    }

    /// Display label for console output.
    pub fn label(&self) -> &'static str {
        match self {
            MessageSource::Human => "Human users",
            MessageSource::Commander => "AI Commander",
            MessageSource::System => "B2 system",
            MessageSource::Executor => "Executor",
            MessageSource::Auditor => "Auditor",
        }
    }
}

impl From<AiRole> for MessageSource {
    fn from(role: AiRole) -> Self {
        match role {
            AiRole::Executor => MessageSource::Executor,
            AiRole::Auditor => MessageSource::Auditor,
        }
    }
}

impl From<SenderRole> for MessageSource {
    fn from(sender: SenderRole) -> Self {
        match sender {
            SenderRole::Human => MessageSource::Human,
            SenderRole::Commander => MessageSource::Commander,
            SenderRole::System => MessageSource::System,
        }
    }
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSource::Human => write!(f, "human"),
            MessageSource::Commander => write!(f, "commander"),
            MessageSource::System => write!(f, "system"),
            MessageSource::Executor => write!(f, "executor"),
            MessageSource::Auditor => write!(f, "auditor"),
        }
    }
}

impl FromStr for MessageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(MessageSource::Human),
            "commander" => Ok(MessageSource::Commander),
            "system" => Ok(MessageSource::System),
            "executor" => Ok(MessageSource::Executor),
            "auditor" => Ok(MessageSource::Auditor),
            other => Err(format!("invalid message source: '{other}'")),
        }
    }
}
