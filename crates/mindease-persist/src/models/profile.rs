use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-identity profile used to personalise the companion.
///
/// `age == 0` means the user has not set it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub fears: Vec<String>,
    #[serde(default)]
    pub stress_factors: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile: only the fields that are `Some` are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fears: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_factors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<Vec<String>>,
}

impl UserProfile {
    /// New profile with empty defaults for every field the partial leaves out
    pub fn new(uid: impl Into<String>, email: impl Into<String>, initial: ProfileUpdate) -> Self {
        let now = Utc::now();
        Self {
            uid: uid.into(),
            email: email.into(),
            name: initial.name.unwrap_or_default(),
            age: initial.age.unwrap_or_default(),
            fears: initial.fears.unwrap_or_default(),
            stress_factors: initial.stress_factors.unwrap_or_default(),
            hobbies: initial.hobbies.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update and bump `updated_at`
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(age) = update.age {
            self.age = age;
        }
        if let Some(fears) = update.fears {
            self.fears = fears;
        }
        if let Some(stress_factors) = update.stress_factors {
            self.stress_factors = stress_factors;
        }
        if let Some(hobbies) = update.hobbies {
            self.hobbies = hobbies;
        }
        self.updated_at = Utc::now();
    }
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.fears.is_none()
            && self.stress_factors.is_none()
            && self.hobbies.is_none()
    }
}
