use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::Client;

use crate::dbs::mongo::repositories::{MongoProfileRepository, MongoRecordRepository};
use crate::error::{PersistError, Result};
use crate::models::{
    ChatPayload, JournalPayload, MoodPayload, ProfileUpdate, Record, RecordPayload, SortOrder,
    UserProfile,
};
use crate::trait_client::{ProfileStore, RecordStore};

/// MongoDB backend: `users`, `chat_messages`, `journal_entries`, `mood_entries`
#[derive(Clone)]
pub struct MongoPersistenceClient {
    client: Client,
    database: String,
    profiles: MongoProfileRepository,
    chats: MongoRecordRepository<ChatPayload>,
    journal: MongoRecordRepository<JournalPayload>,
    moods: MongoRecordRepository<MoodPayload>,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            profiles: MongoProfileRepository::new(&client, database),
            chats: MongoRecordRepository::new(&client, database),
            journal: MongoRecordRepository::new(&client, database),
            moods: MongoRecordRepository::new(&client, database),
            database: database.to_string(),
            client,
        })
    }

    /// Round-trip to the server; the driver connects lazily
    pub async fn ping(&self) -> Result<()> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        Ok(())
    }
}

mod sealed {
    use super::*;

    pub trait Records<P: RecordPayload> {
        fn records(&self) -> &MongoRecordRepository<P>;
    }
}

use sealed::Records;

impl Records<ChatPayload> for MongoPersistenceClient {
    fn records(&self) -> &MongoRecordRepository<ChatPayload> {
        &self.chats
    }
}

impl Records<JournalPayload> for MongoPersistenceClient {
    fn records(&self) -> &MongoRecordRepository<JournalPayload> {
        &self.journal
    }
}

impl Records<MoodPayload> for MongoPersistenceClient {
    fn records(&self) -> &MongoRecordRepository<MoodPayload> {
        &self.moods
    }
}

#[async_trait]
impl ProfileStore for MongoPersistenceClient {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>> {
        Ok(self.profiles.get(uid).await?.map(UserProfile::from))
    }

    async fn create(&self, uid: &str, email: &str, initial: ProfileUpdate) -> Result<UserProfile> {
        let stored = self
            .profiles
            .create(UserProfile::new(uid, email, initial))
            .await?;
        Ok(stored.into())
    }

    async fn update(&self, uid: &str, update: ProfileUpdate) -> Result<()> {
        self.profiles.update(uid, update).await
    }
}

#[async_trait]
impl<P> RecordStore<P> for MongoPersistenceClient
where
    P: RecordPayload,
    MongoPersistenceClient: Records<P>,
{
    async fn append_at(&self, uid: &str, created_at: DateTime<Utc>, payload: P) -> Result<Record<P>> {
        <Self as Records<P>>::records(self)
            .append(uid, created_at, payload)
            .await
    }

    async fn list(&self, uid: &str, limit: usize, order: SortOrder) -> Result<Vec<Record<P>>> {
        <Self as Records<P>>::records(self).list(uid, limit, order).await
    }
}
