use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Profile, ProfileUpdate, User};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
    pub user: User,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, AppError> {
    let store = state.store.lock().await;
    let user = store.require_user()?.clone();
    Ok(Json(ProfileResponse {
        profile: store.profile().cloned(),
        user,
    }))
}

/// PUT /api/v1/profile
///
/// Merges the submitted form over the stored profile. Blank required fields
/// come back as a 400 with one entry per field.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut store = state.store.lock().await;
    store.require_user()?;

    let profile = store.update_profile(update).await?.clone();
    let user = store.require_user()?.clone();
    Ok(Json(ProfileResponse {
        profile: Some(profile),
        user,
    }))
}
