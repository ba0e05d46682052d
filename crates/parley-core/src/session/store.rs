//! SessionStore trait definition.
//!
//! Single-key persistence for session records. Uses native async fn in
//! traits (RPITIT, Rust 2024 edition). Implementations live in
//! parley-infra (e.g., `SqliteSessionStore`).

use chrono::{DateTime, Utc};

use parley_types::error::StoreError;
use parley_types::session::{SessionRecord, StoredMessage};

/// Store trait for session record persistence.
///
/// The store is assumed strongly consistent read-after-write for a single
/// key; no cross-key transactions are used or required.
pub trait SessionStore: Send + Sync {
    /// Get a session record by its identifier.
    fn get(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<SessionRecord>, StoreError>> + Send;

    /// Persist a full record (upsert overwrite). Used only at creation.
    fn put(
        &self,
        record: &SessionRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Overwrite a session's messages and `updated_at`, conditional on the
    /// stored revision matching `expected_revision`; bumps the revision.
    ///
    /// A revision mismatch (a concurrent writer won the race) fails with
    /// [`StoreError::Conflict`] and leaves the record untouched.
    fn update_messages(
        &self,
        session_id: &str,
        messages: &[StoredMessage],
        updated_at: DateTime<Utc>,
        expected_revision: u64,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Count sessions owned by the given owner (for quota enforcement).
    fn count_owned(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;
}
