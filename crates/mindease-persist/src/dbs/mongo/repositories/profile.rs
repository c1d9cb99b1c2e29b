use bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoProfile;
use crate::error::{PersistError, Result};
use crate::models::{ProfileUpdate, UserProfile};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoProfileRepository {
    collection: Collection<MongoProfile>,
}

impl MongoProfileRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    pub async fn get(&self, uid: &str) -> Result<Option<MongoProfile>> {
        Ok(self.collection.find_one(doc! { "_id": uid }).await?)
    }

    /// Insert keyed on `_id = uid`. A concurrent first login that loses the
    /// race gets the winner's document back.
    pub async fn create(&self, profile: UserProfile) -> Result<MongoProfile> {
        let document = MongoProfile::from(profile);

        match self.collection.insert_one(&document).await {
            Ok(_) => Ok(document),
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(uid = %document.uid, "profile already exists, returning stored copy");
                self.get(&document.uid)
                    .await?
                    .ok_or_else(|| PersistError::ProfileNotFound(document.uid.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update(&self, uid: &str, update: ProfileUpdate) -> Result<()> {
        let result = self
            .collection
            .update_one(doc! { "_id": uid }, doc! { "$set": set_document(update) })
            .await?;

        if result.matched_count == 0 {
            return Err(PersistError::ProfileNotFound(uid.to_string()));
        }
        Ok(())
    }
}

fn set_document(update: ProfileUpdate) -> Document {
    let mut set = doc! { "updated_at": bson::DateTime::now() };
    if let Some(name) = update.name {
        set.insert("name", name);
    }
    if let Some(age) = update.age {
        set.insert("age", Bson::Int64(i64::from(age)));
    }
    if let Some(fears) = update.fears {
        set.insert("fears", fears);
    }
    if let Some(stress_factors) = update.stress_factors {
        set.insert("stress_factors", stress_factors);
    }
    if let Some(hobbies) = update.hobbies {
        set.insert("hobbies", hobbies);
    }
    set
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_document_only_carries_present_fields() {
        let set = set_document(ProfileUpdate {
            age: Some(30),
            hobbies: Some(vec!["yoga".to_string()]),
            ..Default::default()
        });

        assert!(set.contains_key("updated_at"));
        assert_eq!(set.get_i64("age").unwrap(), 30);
        assert!(set.contains_key("hobbies"));
        assert!(!set.contains_key("name"));
        assert!(!set.contains_key("fears"));
    }
}
