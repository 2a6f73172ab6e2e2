use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Resume, ResumeUpdate};
use crate::state::AppState;
use crate::templates::TemplateId;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateResumeRequest {
    pub template_id: TemplateId,
    /// Defaults to the next "Резюме <n>" title.
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeListResponse {
    pub resumes: Vec<Resume>,
    pub next_title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        TemplateId::ALL
            .into_iter()
            .map(|id| TemplateInfo {
                id,
                name: id.display_name(),
            })
            .collect(),
    )
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(State(state): State<AppState>) -> Result<Json<ResumeListResponse>, AppError> {
    let store = state.store.lock().await;
    store.require_user()?;
    Ok(Json(ResumeListResponse {
        resumes: store.resumes().to_vec(),
        next_title: store.next_resume_title(),
    }))
}

/// POST /api/v1/resumes
///
/// Snapshots the current profile into a new résumé and selects it.
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    let mut store = state.store.lock().await;
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| store.next_resume_title());

    store.create_resume(request.template_id, &title).await?;
    let created = store
        .current_resume()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("created résumé is not selected"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<Resume>, AppError> {
    let mut store = state.store.lock().await;
    store.require_user()?;
    let updated = store.update_resume(&id, update).await?.clone();
    Ok(Json(updated))
}

/// POST /api/v1/resumes/:id/select
///
/// An unknown id clears the selection and answers 404.
pub async fn handle_select_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let mut store = state.store.lock().await;
    store.require_user()?;
    store
        .select_resume(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Резюме {id} не найдено")))
}
