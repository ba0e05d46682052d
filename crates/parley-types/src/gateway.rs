//! Completion gateway wire types for Parley.
//!
//! The gateway consumes an ordered sequence of role-tagged turns and
//! returns a single text reply. Turns carry role and content only --
//! timestamps and any other stored metadata are stripped before a call.

use serde::{Deserialize, Serialize};

use crate::session::{MessageRole, StoredMessage};

/// A single turn sent to the completion gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

impl From<&StoredMessage> for ChatTurn {
    fn from(message: &StoredMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Strip stored messages down to gateway turns, preserving order.
pub fn to_turns(messages: &[StoredMessage]) -> Vec<ChatTurn> {
    messages.iter().map(ChatTurn::from).collect()
}
