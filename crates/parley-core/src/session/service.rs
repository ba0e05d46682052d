//! Session service orchestrating the record lifecycle.
//!
//! SessionService owns the three operations -- create-or-fetch, append
//! message and obtain reply, fetch full history -- and enforces the
//! per-session and per-owner quotas. Each operation is a single
//! synchronous unit of work: at most one gateway call, one store read,
//! and one store write per invocation (initialize may also issue one
//! owner-count query).

use chrono::Utc;
use tracing::{info, warn};

use parley_types::config::SessionLimits;
use parley_types::error::{SessionError, StoreError};
use parley_types::gateway::to_turns;
use parley_types::session::{
    ChatReply, MessageRole, SessionRecord, SessionSeeds, SessionView, StoredMessage,
};

use crate::gateway::CompletionGateway;
use crate::session::store::SessionStore;

/// Orchestrates session lifecycle, quota enforcement, and gateway turns.
///
/// Generic over `SessionStore` and `CompletionGateway` to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct SessionService<S: SessionStore, G: CompletionGateway> {
    store: S,
    gateway: G,
    limits: SessionLimits,
}

impl<S: SessionStore, G: CompletionGateway> SessionService<S, G> {
    /// Create a new session service with the given store, gateway, and quotas.
    pub fn new(store: S, gateway: G, limits: SessionLimits) -> Self {
        Self {
            store,
            gateway,
            limits,
        }
    }

    /// Create a session, or fetch it if it already exists.
    ///
    /// On the fetch path nothing is mutated, even if seeds are supplied --
    /// seeding applies only to brand-new sessions. On the create path the
    /// seeded messages are built in fixed order (system, assistant, user);
    /// a seed user message triggers one gateway call, and a gateway
    /// failure aborts the whole initialization with no partial write.
    ///
    /// The returned view carries the session's non-system messages.
    pub async fn initialize_or_fetch(
        &self,
        session_id: &str,
        owner_id: &str,
        seeds: &SessionSeeds,
    ) -> Result<SessionView, SessionError> {
        if let Some(existing) = self.store.get(session_id).await? {
            if existing.owner_id != owner_id {
                warn!(session_id, owner_id, "owner mismatch on existing session");
                return Err(SessionError::OwnerMismatch);
            }
            return Ok(SessionView {
                session_id: existing.session_id.clone(),
                owner_id: existing.owner_id.clone(),
                is_new: false,
                messages: existing.visible_messages(),
            });
        }

        if let Some(max) = self.limits.max_sessions_per_owner {
            let owned = self.store.count_owned(owner_id).await?;
            if owned >= u64::from(max) {
                return Err(SessionError::OwnerQuotaExceeded(max));
            }
        }

        let now = Utc::now();
        let mut messages = Vec::new();

        if let Some(system) = &seeds.system_message {
            messages.push(StoredMessage::new(MessageRole::System, system, now));
        }
        if let Some(assistant) = &seeds.assistant_message {
            messages.push(StoredMessage::new(MessageRole::Assistant, assistant, now));
        }
        if let Some(user) = &seeds.user_message {
            messages.push(StoredMessage::new(MessageRole::User, user, now));

            // One generated opening reply; nothing is persisted if the
            // gateway fails, so the session never exists half-built.
            let reply = self.gateway.complete(&to_turns(&messages)).await?;
            messages.push(StoredMessage::new(MessageRole::Assistant, reply, Utc::now()));
        }

        let record = SessionRecord {
            session_id: session_id.to_string(),
            owner_id: owner_id.to_string(),
            messages,
            created_at: now,
            updated_at: now,
            revision: 0,
        };
        self.store.put(&record).await?;

        info!(session_id, owner_id, "session created");

        Ok(SessionView {
            session_id: record.session_id.clone(),
            owner_id: record.owner_id.clone(),
            is_new: true,
            messages: record.visible_messages(),
        })
    }

    /// Append a user message, obtain the assistant reply, persist both.
    ///
    /// The user-message quota is checked before any mutation. On gateway
    /// failure the session is left exactly as it was -- the user's own
    /// message is not persisted, so no orphaned unanswered turn remains.
    /// The final write is conditional on the revision read at the start of
    /// the call; losing that race yields [`SessionError::Conflict`] rather
    /// than silently dropping a concurrent turn.
    pub async fn append_and_respond(
        &self,
        session_id: &str,
        owner_id: &str,
        message_text: &str,
    ) -> Result<ChatReply, SessionError> {
        let record = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        if record.owner_id != owner_id {
            warn!(session_id, owner_id, "owner mismatch on append");
            return Err(SessionError::OwnerMismatch);
        }

        if let Some(max) = self.limits.max_user_messages {
            if record.user_message_count() >= max as usize {
                return Err(SessionError::MessageQuotaExceeded(max));
            }
        }

        let mut messages = record.messages.clone();
        messages.push(StoredMessage::new(MessageRole::User, message_text, Utc::now()));

        let reply = self.gateway.complete(&to_turns(&messages)).await?;
        messages.push(StoredMessage::new(
            MessageRole::Assistant,
            reply.clone(),
            Utc::now(),
        ));

        self.store
            .update_messages(session_id, &messages, Utc::now(), record.revision)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => SessionError::Conflict,
                other => SessionError::Store(other),
            })?;

        info!(session_id, owner_id, "turn completed");

        Ok(ChatReply {
            reply,
            session_id: record.session_id,
            owner_id: record.owner_id,
        })
    }

    /// Fetch the complete stored record, system messages included.
    ///
    /// History is deliberately unfiltered, unlike the other two
    /// operations: experimenters need the seeded context when exporting a
    /// conversation.
    pub async fn fetch_history(
        &self,
        session_id: &str,
        owner_id: &str,
    ) -> Result<SessionRecord, SessionError> {
        let record = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        if record.owner_id != owner_id {
            warn!(session_id, owner_id, "owner mismatch on history fetch");
            return Err(SessionError::OwnerMismatch);
        }

        Ok(record)
    }
}
