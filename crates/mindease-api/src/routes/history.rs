use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use mindease_core::{ConversationTurn, SortOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, middleware::Identity, state::AppState};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnResponse {
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ConversationTurn> for ChatTurnResponse {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content,
            created_at: turn.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    pub messages: Vec<ChatTurnResponse>,
}

/// Recorded chat turns of the caller
#[utoipa::path(
    get,
    path = "/api/chat/history",
    params(
        ("limit" = Option<usize>, Query, description = "Most recent N turns (default 50, max 100)"),
        ("order" = Option<String>, Query, description = "asc (default) or desc")
    ),
    responses(
        (status = 200, description = "Transcript", body = HistoryResponse),
        (status = 401, description = "Missing identity")
    ),
    tag = "chat"
)]
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let limits = &state.config.chat;
    let limit = query
        .limit
        .unwrap_or(limits.history_default_limit)
        .min(limits.history_max_limit);

    let turns = state
        .persister
        .history(&identity.uid, limit, query.order)
        .await?;

    Ok(Json(HistoryResponse {
        messages: turns.into_iter().map(ChatTurnResponse::from).collect(),
    }))
}
