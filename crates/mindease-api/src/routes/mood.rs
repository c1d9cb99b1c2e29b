use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use mindease_core::{mood_suggestion, MoodLevel, SortOrder, MOOD_SCALE};
use mindease_persist::{MoodPayload, Record};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    middleware::Identity,
    routes::journal::ListQuery,
    state::AppState,
};

const MOOD_RANGE: std::ops::RangeInclusive<i64> = 2..=10;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMoodRequest {
    /// 2 (very sad) to 10 (very happy)
    pub mood: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntryResponse {
    pub id: String,
    pub mood: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Record<MoodPayload>> for MoodEntryResponse {
    fn from(record: Record<MoodPayload>) -> Self {
        Self {
            id: record.id,
            mood: record.payload.mood,
            label: MoodLevel::lookup(record.payload.mood).map(|l| l.label.to_string()),
            notes: record.payload.notes,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MoodLevelResponse {
    pub value: u8,
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MoodListResponse {
    pub entries: Vec<MoodEntryResponse>,
    pub suggestion: String,
    pub scale: Vec<MoodLevelResponse>,
}

/// Record a mood on the 2..=10 scale
#[utoipa::path(
    post,
    path = "/api/mood",
    request_body = CreateMoodRequest,
    responses(
        (status = 201, description = "Mood saved", body = MoodEntryResponse),
        (status = 400, description = "Mood outside 2..=10"),
        (status = 401, description = "Missing identity")
    ),
    tag = "mood"
)]
pub async fn create_mood(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateMoodRequest>,
) -> ApiResult<(StatusCode, Json<MoodEntryResponse>)> {
    if !MOOD_RANGE.contains(&req.mood) {
        return Err(ApiError::BadRequest(format!(
            "Mood must be between {} and {}, got {}",
            MOOD_RANGE.start(),
            MOOD_RANGE.end(),
            req.mood
        )));
    }
    let mood = u8::try_from(req.mood).map_err(|_| ApiError::Internal)?;

    let record = state
        .moods
        .append(
            &identity.uid,
            MoodPayload {
                mood,
                notes: req.notes.filter(|n| !n.trim().is_empty()),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Recent moods, newest first, with a tip based on their average
#[utoipa::path(
    get,
    path = "/api/mood",
    params(
        ("limit" = Option<usize>, Query, description = "Most recent N entries (default 10)")
    ),
    responses(
        (status = 200, description = "Entries and suggestion", body = MoodListResponse),
        (status = 401, description = "Missing identity")
    ),
    tag = "mood"
)]
pub async fn list_moods(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<MoodListResponse>> {
    let limit = query.limit.unwrap_or(state.config.chat.list_default_limit);
    let records = state
        .moods
        .list(&identity.uid, limit, SortOrder::Descending)
        .await?;

    let values: Vec<u8> = records.iter().map(|r| r.payload.mood).collect();

    Ok(Json(MoodListResponse {
        suggestion: mood_suggestion(&values).to_string(),
        entries: records.into_iter().map(MoodEntryResponse::from).collect(),
        scale: MOOD_SCALE
            .iter()
            .map(|level| MoodLevelResponse {
                value: level.value,
                label: level.label.to_string(),
            })
            .collect(),
    }))
}
