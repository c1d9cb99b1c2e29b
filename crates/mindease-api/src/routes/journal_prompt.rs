use axum::{extract::State, Json};
use mindease_core::{compose_journal_prompt, templates::JOURNAL_INSTRUCTION, CompletionSettings, ProfileProjection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::{ApiError, ApiResult}, state::AppState};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalPromptRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub user_data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JournalPromptResponse {
    pub prompt: String,
}

/// Generate one personalised journal prompt
#[utoipa::path(
    post,
    path = "/api/journal-prompt",
    request_body = JournalPromptRequest,
    responses(
        (status = 200, description = "Generated prompt", body = JournalPromptResponse),
        (status = 500, description = "Error generating prompt", content_type = "text/plain"),
        (status = 503, description = "Model credential not configured", content_type = "text/plain")
    ),
    tag = "journal"
)]
pub async fn generate_journal_prompt(
    State(state): State<Arc<AppState>>,
    Json(req): Json<JournalPromptRequest>,
) -> ApiResult<Json<JournalPromptResponse>> {
    let gateway = state.engine.gateway();
    if !gateway.is_configured() {
        return Err(ApiError::NotConfigured);
    }

    let profile = req.user_data.as_ref().map(ProfileProjection::from_value);
    let system_prompt = compose_journal_prompt(profile.as_ref());

    let prompt = gateway
        .generate(&system_prompt, JOURNAL_INSTRUCTION, CompletionSettings::JOURNAL_PROMPT)
        .await
        .map_err(ApiError::from_prompt)?;

    Ok(Json(JournalPromptResponse {
        prompt: prompt.trim().to_string(),
    }))
}
