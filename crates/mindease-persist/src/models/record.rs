use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One append-only record owned by an identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<P> {
    pub id: String,
    pub uid: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: P,
}

/// Payload kinds stored in their own collection
pub trait RecordPayload:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    /// Collection (table) name shared by every backend
    const COLLECTION: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub role: ChatRole,
    pub content: String,
}

impl RecordPayload for ChatPayload {
    const COLLECTION: &'static str = "chat_messages";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPayload {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl RecordPayload for JournalPayload {
    const COLLECTION: &'static str = "journal_entries";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPayload {
    pub mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RecordPayload for MoodPayload {
    const COLLECTION: &'static str = "mood_entries";
}

/// Read direction for record listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

/// Keep the `limit` most recent records, then order them as requested.
///
/// `newest_first` must already be sorted newest to oldest.
pub fn select_recent<P>(
    newest_first: impl IntoIterator<Item = Record<P>>,
    limit: usize,
    order: SortOrder,
) -> Vec<Record<P>> {
    let mut selected: Vec<Record<P>> = newest_first.into_iter().take(limit).collect();
    if order == SortOrder::Ascending {
        selected.reverse();
    }
    selected
}
