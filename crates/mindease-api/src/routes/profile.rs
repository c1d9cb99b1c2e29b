use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use mindease_core::AuthSession;
use mindease_persist::{ProfileUpdate, UserProfile};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::{ApiError, ApiResult}, middleware::Identity, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub age: u32,
    pub fears: Vec<String>,
    pub stress_factors: Vec<String>,
    pub hobbies: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&UserProfile> for ProfileResponse {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            email: profile.email.clone(),
            name: profile.name.clone(),
            age: profile.age,
            fears: profile.fears.clone(),
            stress_factors: profile.stress_factors.clone(),
            hobbies: profile.hobbies.clone(),
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Partial profile edit; absent fields are left untouched
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub fears: Option<Vec<String>>,
    pub stress_factors: Option<Vec<String>>,
    pub hobbies: Option<Vec<String>>,
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            name: req.name.map(|n| n.trim().to_string()),
            age: req.age,
            fears: req.fears.map(clean_list),
            stress_factors: req.stress_factors.map(clean_list),
            hobbies: req.hobbies.map(clean_list),
        }
    }
}

/// Caller's profile, created with empty defaults on first access
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Missing identity")
    ),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> ApiResult<Json<ProfileResponse>> {
    let session = AuthSession::establish(state.profiles.clone(), &identity.uid, &identity.email).await?;
    Ok(Json(ProfileResponse::from(session.profile())))
}

/// Merge a partial update into the caller's profile
#[utoipa::path(
    patch,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Merged profile", body = ProfileResponse),
        (status = 400, description = "Empty update"),
        (status = 401, description = "Missing identity")
    ),
    tag = "profile"
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    let update = ProfileUpdate::from(req);
    if update.is_empty() {
        return Err(ApiError::BadRequest("No profile fields to update".to_string()));
    }

    let mut session =
        AuthSession::establish(state.profiles.clone(), &identity.uid, &identity.email).await?;
    let profile = session.update_profile(update).await?;

    tracing::info!(uid = %identity.uid, "Profile updated");
    Ok(Json(ProfileResponse::from(profile)))
}
