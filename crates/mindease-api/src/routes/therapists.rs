use axum::Json;
use mindease_core::{therapists, Therapist};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TherapistResponse {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub availability: String,
    pub rating: f32,
    pub experience: String,
    pub location: String,
    pub price: String,
}

impl From<Therapist> for TherapistResponse {
    fn from(t: Therapist) -> Self {
        Self {
            id: t.id,
            name: t.name.to_string(),
            specialty: t.specialty.to_string(),
            availability: t.availability.to_string(),
            rating: t.rating,
            experience: t.experience.to_string(),
            location: t.location.to_string(),
            price: t.price.to_string(),
        }
    }
}

/// Licensed therapists open for booking
#[utoipa::path(
    get,
    path = "/api/therapists",
    responses(
        (status = 200, description = "Directory", body = [TherapistResponse])
    ),
    tag = "therapists"
)]
pub async fn list_therapists() -> Json<Vec<TherapistResponse>> {
    Json(therapists().into_iter().map(TherapistResponse::from).collect())
}
