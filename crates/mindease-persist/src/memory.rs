use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{
    select_recent, ChatPayload, JournalPayload, MoodPayload, ProfileUpdate, Record,
    RecordPayload, SortOrder, UserProfile,
};
use crate::trait_client::{ProfileStore, RecordStore};

/// Process-local backend for development and tests.
///
/// Each collection stays sorted by `created_at`; a late write with an earlier
/// stamp is inserted after every record stamped at or before it.
#[derive(Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, UserProfile>>,
    chats: RwLock<Vec<Record<ChatPayload>>>,
    journal: RwLock<Vec<Record<JournalPayload>>>,
    moods: RwLock<Vec<Record<MoodPayload>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

mod sealed {
    use super::*;

    /// Maps a payload type to the vector holding its collection
    pub trait Table<P> {
        fn table(&self) -> &RwLock<Vec<Record<P>>>;
    }
}

use sealed::Table;

impl Table<ChatPayload> for MemoryStore {
    fn table(&self) -> &RwLock<Vec<Record<ChatPayload>>> {
        &self.chats
    }
}

impl Table<JournalPayload> for MemoryStore {
    fn table(&self) -> &RwLock<Vec<Record<JournalPayload>>> {
        &self.journal
    }
}

impl Table<MoodPayload> for MemoryStore {
    fn table(&self) -> &RwLock<Vec<Record<MoodPayload>>> {
        &self.moods
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(uid).cloned())
    }

    async fn create(&self, uid: &str, email: &str, initial: ProfileUpdate) -> Result<UserProfile> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(uid.to_string())
            .or_insert_with(|| UserProfile::new(uid, email, initial));
        Ok(profile.clone())
    }

    async fn update(&self, uid: &str, update: ProfileUpdate) -> Result<()> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(uid)
            .ok_or_else(|| PersistError::ProfileNotFound(uid.to_string()))?;
        profile.apply(update);
        Ok(())
    }
}

#[async_trait]
impl<P> RecordStore<P> for MemoryStore
where
    P: RecordPayload,
    MemoryStore: Table<P>,
{
    async fn append_at(&self, uid: &str, created_at: DateTime<Utc>, payload: P) -> Result<Record<P>> {
        let mut table = <Self as Table<P>>::table(self).write().await;

        let record = Record {
            id: uuid::Uuid::new_v4().to_string(),
            uid: uid.to_string(),
            created_at,
            payload,
        };
        let position = table.partition_point(|r| r.created_at <= created_at);
        table.insert(position, record.clone());
        Ok(record)
    }

    async fn list(&self, uid: &str, limit: usize, order: SortOrder) -> Result<Vec<Record<P>>> {
        let table = <Self as Table<P>>::table(self).read().await;
        let newest_first = table.iter().rev().filter(|r| r.uid == uid).cloned();
        Ok(select_recent(newest_first, limit, order))
    }
}
