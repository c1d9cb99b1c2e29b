use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{ProfileUpdate, Record, RecordPayload, SortOrder, UserProfile};

/// Profile persistence, keyed by the authenticated identity
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile, `None` on first login
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>>;

    /// Create the profile with empty defaults for anything `initial` leaves out.
    ///
    /// The identity is the primary key: when a profile already exists it is
    /// returned unchanged instead of being overwritten or duplicated.
    async fn create(&self, uid: &str, email: &str, initial: ProfileUpdate) -> Result<UserProfile>;

    /// Merge a partial update. Fails with `ProfileNotFound` if absent.
    async fn update(&self, uid: &str, update: ProfileUpdate) -> Result<()>;
}

/// Append-only, identity-scoped record collection (chat, journal, mood)
#[async_trait]
pub trait RecordStore<P: RecordPayload>: Send + Sync {
    /// Store a record stamped with `created_at`.
    ///
    /// Lists order by this timestamp, not by when the write landed, so a
    /// caller that already knows when the event happened keeps that order
    /// even if writes complete out of sequence.
    async fn append_at(&self, uid: &str, created_at: DateTime<Utc>, payload: P) -> Result<Record<P>>;

    async fn append(&self, uid: &str, payload: P) -> Result<Record<P>> {
        self.append_at(uid, Utc::now(), payload).await
    }

    /// The `limit` most recent records of `uid`, ordered by `order`
    async fn list(&self, uid: &str, limit: usize, order: SortOrder) -> Result<Vec<Record<P>>>;
}
