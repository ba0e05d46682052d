//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `parley-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, messages stored
//! as a JSON text column and deserialized on read.

use chrono::{DateTime, Utc};
use sqlx::Row;

use parley_core::session::store::SessionStore;
use parley_types::error::StoreError;
use parley_types::session::{SessionRecord, StoredMessage};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionStore`.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    /// Create a new session store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    session_id: String,
    owner_id: String,
    messages: String,
    created_at: String,
    updated_at: String,
    revision: i64,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            owner_id: row.try_get("owner_id")?,
            messages: row.try_get("messages")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            revision: row.try_get("revision")?,
        })
    }

    fn into_record(self) -> Result<SessionRecord, StoreError> {
        let messages: Vec<StoredMessage> = serde_json::from_str(&self.messages)
            .map_err(|e| StoreError::Query(format!("invalid messages JSON: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;
        let updated_at = parse_datetime(&self.updated_at)?;

        Ok(SessionRecord {
            session_id: self.session_id,
            owner_id: self.owner_id,
            messages,
            created_at,
            updated_at,
            revision: self.revision as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn encode_messages(messages: &[StoredMessage]) -> Result<String, StoreError> {
    serde_json::to_string(messages)
        .map_err(|e| StoreError::Query(format!("failed to serialize messages: {e}")))
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row =
                    SessionRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(session_row.into_record()?))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, record: &SessionRecord) -> Result<(), StoreError> {
        let messages = encode_messages(&record.messages)?;

        sqlx::query(
            r#"INSERT INTO sessions (session_id, owner_id, messages, created_at, updated_at, revision)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT (session_id) DO UPDATE SET
                   owner_id = excluded.owner_id,
                   messages = excluded.messages,
                   created_at = excluded.created_at,
                   updated_at = excluded.updated_at,
                   revision = excluded.revision"#,
        )
        .bind(&record.session_id)
        .bind(&record.owner_id)
        .bind(&messages)
        .bind(format_datetime(&record.created_at))
        .bind(format_datetime(&record.updated_at))
        .bind(record.revision as i64)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn update_messages(
        &self,
        session_id: &str,
        messages: &[StoredMessage],
        updated_at: DateTime<Utc>,
        expected_revision: u64,
    ) -> Result<(), StoreError> {
        let encoded = encode_messages(messages)?;

        let result = sqlx::query(
            r#"UPDATE sessions
               SET messages = ?, updated_at = ?, revision = revision + 1
               WHERE session_id = ? AND revision = ?"#,
        )
        .bind(&encoded)
        .bind(format_datetime(&updated_at))
        .bind(session_id)
        .bind(expected_revision as i64)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!(
                "session '{session_id}' missing or revision {expected_revision} stale"
            )));
        }

        Ok(())
    }

    async fn count_owned(&self, owner_id: &str) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::session::MessageRole;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn record(session_id: &str, owner_id: &str, messages: Vec<StoredMessage>) -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            session_id: session_id.to_string(),
            owner_id: owner_id.to_string(),
            messages,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = SqliteSessionStore::new(test_pool().await);

        let messages = vec![
            StoredMessage::new(MessageRole::System, "be terse", Utc::now()),
            StoredMessage::new(MessageRole::User, "hello", Utc::now()),
        ];
        let original = record("s1", "u1", messages);
        store.put(&original).await.unwrap();

        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.session_id, "s1");
        assert_eq!(got.owner_id, "u1");
        assert_eq!(got.messages, original.messages);
        assert_eq!(got.revision, 0);
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let store = SqliteSessionStore::new(test_pool().await);

        let got = store.get("missing").await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = SqliteSessionStore::new(test_pool().await);

        store.put(&record("s1", "u1", Vec::new())).await.unwrap();
        let replacement = record(
            "s1",
            "u1",
            vec![StoredMessage::new(MessageRole::User, "hi", Utc::now())],
        );
        store.put(&replacement).await.unwrap();

        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.messages.len(), 1);
    }

    #[tokio::test]
    async fn test_update_messages_bumps_revision() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.put(&record("s1", "u1", Vec::new())).await.unwrap();

        let messages = vec![
            StoredMessage::new(MessageRole::User, "hello", Utc::now()),
            StoredMessage::new(MessageRole::Assistant, "hi there", Utc::now()),
        ];
        let updated_at = Utc::now();
        store
            .update_messages("s1", &messages, updated_at, 0)
            .await
            .unwrap();

        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.messages, messages);
        assert_eq!(got.revision, 1);
        assert_eq!(got.updated_at, updated_at);
    }

    #[tokio::test]
    async fn test_update_messages_stale_revision_conflicts() {
        let store = SqliteSessionStore::new(test_pool().await);
        store.put(&record("s1", "u1", Vec::new())).await.unwrap();

        store
            .update_messages("s1", &[], Utc::now(), 0)
            .await
            .unwrap();

        let err = store
            .update_messages("s1", &[], Utc::now(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The record is untouched by the losing write.
        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.revision, 1);
    }

    #[tokio::test]
    async fn test_update_messages_unknown_session_conflicts() {
        let store = SqliteSessionStore::new(test_pool().await);

        let err = store
            .update_messages("missing", &[], Utc::now(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_count_owned() {
        let store = SqliteSessionStore::new(test_pool().await);

        store.put(&record("s1", "u1", Vec::new())).await.unwrap();
        store.put(&record("s2", "u1", Vec::new())).await.unwrap();
        store.put(&record("s3", "u2", Vec::new())).await.unwrap();

        assert_eq!(store.count_owned("u1").await.unwrap(), 2);
        assert_eq!(store.count_owned("u2").await.unwrap(), 1);
        assert_eq!(store.count_owned("u3").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_message_timestamps_survive_roundtrip() {
        let store = SqliteSessionStore::new(test_pool().await);

        let stamped = StoredMessage::new(MessageRole::User, "hello", Utc::now());
        let original = record("s1", "u1", vec![stamped.clone()]);
        store.put(&original).await.unwrap();

        let got = store.get("s1").await.unwrap().unwrap();
        assert_eq!(got.messages[0].timestamp, stamped.timestamp);
    }
}
