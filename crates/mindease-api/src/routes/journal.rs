use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use mindease_core::{analyze_sentiment, Sentiment, SortOrder};
use mindease_persist::{JournalPayload, Record};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::{ApiError, ApiResult}, middleware::Identity, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateJournalRequest {
    pub content: String,
    /// Prompt the entry answers, if any
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Record<JournalPayload>> for JournalEntryResponse {
    fn from(record: Record<JournalPayload>) -> Self {
        Self {
            id: record.id,
            content: record.payload.content,
            prompt: record.payload.prompt,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateJournalResponse {
    pub entry: JournalEntryResponse,
    #[schema(value_type = String, example = "positive")]
    pub sentiment: Sentiment,
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JournalListResponse {
    pub entries: Vec<JournalEntryResponse>,
}

/// Save a journal entry and tag its sentiment
#[utoipa::path(
    post,
    path = "/api/journal",
    request_body = CreateJournalRequest,
    responses(
        (status = 201, description = "Entry saved", body = CreateJournalResponse),
        (status = 400, description = "Empty entry"),
        (status = 401, description = "Missing identity")
    ),
    tag = "journal"
)]
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateJournalRequest>,
) -> ApiResult<(StatusCode, Json<CreateJournalResponse>)> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Journal entry must not be empty".to_string()));
    }

    let sentiment = analyze_sentiment(content);
    let record = state
        .journal
        .append(
            &identity.uid,
            JournalPayload {
                content: content.to_string(),
                prompt: req.prompt.filter(|p| !p.trim().is_empty()),
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateJournalResponse {
            entry: record.into(),
            sentiment,
            suggestion: sentiment.suggestion().to_string(),
        }),
    ))
}

/// Caller's journal, newest first
#[utoipa::path(
    get,
    path = "/api/journal",
    params(
        ("limit" = Option<usize>, Query, description = "Most recent N entries (default 10)")
    ),
    responses(
        (status = 200, description = "Entries", body = JournalListResponse),
        (status = 401, description = "Missing identity")
    ),
    tag = "journal"
)]
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<JournalListResponse>> {
    let limit = query.limit.unwrap_or(state.config.chat.list_default_limit);
    let records = state
        .journal
        .list(&identity.uid, limit, SortOrder::Descending)
        .await?;

    Ok(Json(JournalListResponse {
        entries: records.into_iter().map(JournalEntryResponse::from).collect(),
    }))
}
