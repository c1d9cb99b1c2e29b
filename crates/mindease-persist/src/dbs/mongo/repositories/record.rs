use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoRecord;
use crate::error::Result;
use crate::models::{select_recent, Record, RecordPayload, SortOrder};

pub struct MongoRecordRepository<P: RecordPayload> {
    collection: Collection<MongoRecord<P>>,
}

impl<P: RecordPayload> Clone for MongoRecordRepository<P> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
        }
    }
}

impl<P: RecordPayload> MongoRecordRepository<P> {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection(P::COLLECTION);
        Self { collection }
    }

    pub async fn append(&self, uid: &str, created_at: DateTime<Utc>, payload: P) -> Result<Record<P>> {
        let document = MongoRecord {
            id: ObjectId::new(),
            uid: uid.to_string(),
            created_at,
            payload,
        };

        self.collection.insert_one(&document).await?;
        Ok(document.into())
    }

    pub async fn list(&self, uid: &str, limit: usize, order: SortOrder) -> Result<Vec<Record<P>>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let newest_first: Vec<MongoRecord<P>> = self
            .collection
            .find(doc! { "uid": uid })
            .sort(doc! { "created_at": -1, "_id": -1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .await?
            .try_collect()
            .await?;

        Ok(select_recent(newest_first.into_iter().map(Record::from), limit, order))
    }
}
