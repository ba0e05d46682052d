//! Session record and message types for Parley.
//!
//! A session is a persisted, append-only conversation keyed by an opaque
//! caller-supplied identifier and bound to a single owner. Messages are
//! ordered by insertion and never edited or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Role of a message within a session.
///
/// `System` messages seed model context only: they are stored and sent to
/// the gateway, but filtered out of the message lists returned by
/// initialize and chat operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single stored message within a session.
///
/// The timestamp is assigned by the service at insertion time, never by
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl StoredMessage {
    /// Build a message stamped with the given instant.
    pub fn new(role: MessageRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }
}

/// The persisted session entity.
///
/// `owner_id` is set at creation and immutable thereafter; every later
/// operation compares it against the caller-supplied owner. `revision` is
/// bumped by each store update so concurrent appends surface as conflicts
/// instead of silently overwriting each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub owner_id: String,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u64,
}

impl SessionRecord {
    /// Messages with `system` entries filtered out, in stored order.
    pub fn visible_messages(&self) -> Vec<StoredMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .cloned()
            .collect()
    }

    /// Count of stored `user`-role messages (the quota-relevant count).
    pub fn user_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

/// Optional seed content for a brand-new session.
///
/// Seeds apply only when the initialize call actually creates the session;
/// on a pre-existing session they are ignored entirely. The seeded order is
/// fixed: system, then assistant, then user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSeeds {
    /// Initial system message to set model context.
    pub system_message: Option<String>,
    /// Hard-coded opening message shown as coming from the assistant.
    pub assistant_message: Option<String>,
    /// Opening user message; triggers one gateway call so the first
    /// assistant reply is generated rather than hard-coded.
    pub user_message: Option<String>,
}

/// Result of an initialize operation: the session's visible (non-system)
/// messages plus whether this call created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: String,
    pub owner_id: String,
    pub is_new: bool,
    pub messages: Vec<StoredMessage>,
}

/// Result of a chat turn: the assistant's reply plus the session identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
    pub owner_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: MessageRole, content: &str) -> StoredMessage {
        StoredMessage::new(role, content, Utc::now())
    }

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_visible_messages_excludes_system() {
        let record = SessionRecord {
            session_id: "s1".to_string(),
            owner_id: "u1".to_string(),
            messages: vec![
                msg(MessageRole::System, "be terse"),
                msg(MessageRole::User, "hello"),
                msg(MessageRole::Assistant, "hi"),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            revision: 0,
        };

        let visible = record.visible_messages();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].role, MessageRole::User);
        assert_eq!(visible[1].role, MessageRole::Assistant);
    }

    #[test]
    fn test_user_message_count() {
        let record = SessionRecord {
            session_id: "s1".to_string(),
            owner_id: "u1".to_string(),
            messages: vec![
                msg(MessageRole::System, "ctx"),
                msg(MessageRole::User, "one"),
                msg(MessageRole::Assistant, "r1"),
                msg(MessageRole::User, "two"),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            revision: 0,
        };

        assert_eq!(record.user_message_count(), 2);
    }

    #[test]
    fn test_stored_message_serialize_shape() {
        let m = msg(MessageRole::User, "hello");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_session_record_serialize_includes_system() {
        let record = SessionRecord {
            session_id: "s1".to_string(),
            owner_id: "u1".to_string(),
            messages: vec![msg(MessageRole::System, "ctx")],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            revision: 3,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["revision"], 3);
    }
}
