use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::{AppState, StoreBackend}};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Returns the health status of the API and its dependencies
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    let store_status = match &state.backend {
        StoreBackend::Memory => "in-memory",
        StoreBackend::Mongo(client) => match client.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                tracing::warn!("MongoDB ping failed: {}", e);
                "disconnected"
            }
        },
    };
    services.insert(state.backend.name().to_string(), store_status.to_string());

    let llm_status = if state.engine.gateway().is_configured() {
        "configured"
    } else {
        "not_configured"
    };
    services.insert("llm".to_string(), llm_status.to_string());

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    }))
}
