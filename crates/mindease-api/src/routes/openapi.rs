use axum::Json;
use utoipa::OpenApi;

use crate::handlers::chat_stream;
use crate::routes::{health, history, journal, journal_prompt, mood, profile, therapists};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        chat_stream::chat_stream,
        history::chat_history,
        journal_prompt::generate_journal_prompt,
        profile::get_profile,
        profile::update_profile,
        journal::create_entry,
        journal::list_entries,
        mood::create_mood,
        mood::list_moods,
        therapists::list_therapists,
    ),
    components(schemas(
        health::HealthResponse,
        chat_stream::ChatStreamRequest,
        chat_stream::ChatMessageInput,
        history::HistoryResponse,
        history::ChatTurnResponse,
        journal_prompt::JournalPromptRequest,
        journal_prompt::JournalPromptResponse,
        profile::ProfileResponse,
        profile::UpdateProfileRequest,
        journal::CreateJournalRequest,
        journal::CreateJournalResponse,
        journal::JournalEntryResponse,
        journal::JournalListResponse,
        mood::CreateMoodRequest,
        mood::MoodEntryResponse,
        mood::MoodLevelResponse,
        mood::MoodListResponse,
        therapists::TherapistResponse,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "chat", description = "Streaming companion chat and transcript"),
        (name = "journal", description = "Journal entries and prompts"),
        (name = "mood", description = "Mood tracking"),
        (name = "profile", description = "User profile"),
        (name = "therapists", description = "Therapist directory")
    )
)]
pub struct ApiDoc;

/// Generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
