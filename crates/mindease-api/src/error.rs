use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mindease_core::{ChatError, GatewayError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Missing x-user-id header")]
    Unauthorized,

    /// Model credential absent; answered before any upstream call
    #[error("GROQ_API_KEY is not set – add it to your environment")]
    NotConfigured,

    #[error("Chat completion failed: {0}")]
    Chat(String),

    #[error("Journal prompt generation failed: {0}")]
    Prompt(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] mindease_persist::PersistError),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Map a journal-prompt gateway failure
    pub fn from_prompt(error: GatewayError) -> Self {
        match error {
            GatewayError::NotConfigured => ApiError::NotConfigured,
            GatewayError::Upstream(e) => ApiError::Prompt(format!("{:#}", e)),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::EmptyInput | ChatError::NothingToRetry => ApiError::BadRequest(error.to_string()),
            ChatError::Gateway(GatewayError::NotConfigured) => ApiError::NotConfigured,
            ChatError::Gateway(GatewayError::Upstream(e)) => ApiError::Chat(format!("{:#}", e)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Model endpoints answer in plain text, like the chat client expects
        match self {
            ApiError::NotConfigured => {
                tracing::warn!("Completion requested but GROQ_API_KEY is not set");
                return (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response();
            }
            ApiError::Chat(ref e) => {
                tracing::error!("Chat API error: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Error processing chat request")
                    .into_response();
            }
            ApiError::Prompt(ref e) => {
                tracing::error!("Journal prompt API error: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Error generating prompt").into_response();
            }
            _ => {}
        }

        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Persist(mindease_persist::PersistError::ProfileNotFound(_)) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
