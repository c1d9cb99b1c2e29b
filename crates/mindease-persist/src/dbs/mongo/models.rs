use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Record, UserProfile};

/// MongoDB profile document, keyed by the identity itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoProfile {
    #[serde(rename = "_id")]
    pub uid: String,
    pub email: String,
    pub name: String,
    pub age: i64,
    pub fears: Vec<String>,
    pub stress_factors: Vec<String>,
    pub hobbies: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// MongoDB record document; payload fields sit next to the envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRecord<P> {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub uid: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: P,
}

impl From<UserProfile> for MongoProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            uid: profile.uid,
            email: profile.email,
            name: profile.name,
            age: i64::from(profile.age),
            fears: profile.fears,
            stress_factors: profile.stress_factors,
            hobbies: profile.hobbies,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

impl From<MongoProfile> for UserProfile {
    fn from(doc: MongoProfile) -> Self {
        Self {
            uid: doc.uid,
            email: doc.email,
            name: doc.name,
            age: u32::try_from(doc.age).unwrap_or_default(),
            fears: doc.fears,
            stress_factors: doc.stress_factors,
            hobbies: doc.hobbies,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

impl<P> From<MongoRecord<P>> for Record<P> {
    fn from(doc: MongoRecord<P>) -> Self {
        Self {
            id: doc.id.to_hex(),
            uid: doc.uid,
            created_at: doc.created_at,
            payload: doc.payload,
        }
    }
}
