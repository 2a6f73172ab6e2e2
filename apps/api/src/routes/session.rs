//! Handlers for accounts, the session snapshot, and navigation.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::export::PREVIEW_ELEMENT_ID;
use crate::models::Page;
use crate::state::AppState;
use crate::store::SessionSnapshot;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateRequest {
    pub page: Page,
    /// Only meaningful with `page = public-resume`.
    #[serde(default)]
    pub public_resume_id: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
///
/// Creates the account and signs it in; the client continues on the profile form.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut store = state.store.lock().await;
    store
        .register(&request.email, &request.password, &request.name)
        .await?;
    Ok(Json(store.snapshot()))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut store = state.store.lock().await;
    store.login(&request.email, &request.password).await?;
    Ok(Json(store.snapshot()))
}

/// POST /api/v1/auth/logout
///
/// Clears every user-scoped record, persisted ones included, and unmounts the preview.
pub async fn handle_logout(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let mut store = state.store.lock().await;
    store.logout().await?;
    state.surface.unmount(PREVIEW_ELEMENT_ID).await;
    Ok(Json(store.snapshot()))
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.store.lock().await.snapshot())
}

/// PUT /api/v1/navigation
pub async fn handle_navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> Json<SessionSnapshot> {
    let mut store = state.store.lock().await;
    store.set_page(request.page);
    if request.page == Page::PublicResume {
        store.set_public_resume_id(request.public_resume_id);
    }
    Json(store.snapshot())
}
