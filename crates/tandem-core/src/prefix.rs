//! Speaker prefixes for the linear gateway transcript.
//!
//! The gateway sees one user/assistant transcript per AI role, so the
//! three non-assistant senders are distinguished by a literal text marker
//! prepended to their turns. Prefixing is idempotent: a turn that already
//! carries any known marker is left alone, so historical messages can be
//! resent without double-tagging.

use tandem_types::message::MessageDraft;
use tandem_types::role::{MessageSource, SenderRole};
use tandem_types::wire::{WireMessage, WireRole};

pub const HUMAN_PREFIX: &str = "Human users: ";
pub const COMMANDER_PREFIX: &str = "AI Commander: ";
pub const SYSTEM_PREFIX: &str = "B2 system: ";

const KNOWN_PREFIXES: [&str; 3] = [HUMAN_PREFIX, COMMANDER_PREFIX, SYSTEM_PREFIX];

/// The literal marker for a sender role.
pub fn prefix_for(sender: SenderRole) -> &'static str {
    match sender {
        SenderRole::Human => HUMAN_PREFIX,
        SenderRole::Commander => COMMANDER_PREFIX,
        SenderRole::System => SYSTEM_PREFIX,
    }
}

/// Whether the text already starts with any known speaker marker.
pub fn has_known_prefix(content: &str) -> bool {
    KNOWN_PREFIXES.iter().any(|p| content.starts_with(p))
}

/// Tag a channel message draft with the sender's marker.
///
/// Assistant-authored drafts (executor/auditor source) pass through
/// unchanged, as do drafts whose content already carries a marker. For
/// everything else the prefixed text becomes `raw_content`; the display
/// `content` stays prefix-free.
pub fn apply_prefix(draft: MessageDraft, sender: SenderRole) -> MessageDraft {
    match draft.source {
        MessageSource::Executor | MessageSource::Auditor => draft,
        _ if has_known_prefix(&draft.content) => draft,
        _ => {
            let raw = format!("{}{}", prefix_for(sender), draft.content);
            draft.with_raw_content(raw)
        }
    }
}

/// Tag outbound transcript turns with the sender's marker.
///
/// Assistant turns never carry a prefix; already-prefixed turns are left
/// alone. Everything else gets the marker prepended directly to `content`,
/// since this is the value sent to the model.
pub fn prefix_outbound(messages: &[WireMessage], sender: SenderRole) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|m| {
            if m.role == WireRole::Assistant || has_known_prefix(&m.content) {
                m.clone()
            } else {
                WireMessage {
                    role: m.role,
                    content: format!("{}{}", prefix_for(sender), m.content),
                }
            }
        })
        .collect()
}
