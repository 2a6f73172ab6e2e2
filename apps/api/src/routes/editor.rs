//! Handlers for the résumé editor: live preview and the two downloads.
//!
//! The preview is what the PDF export rasterizes, so a PDF can only be
//! exported after the preview has been rendered at least once. Each export
//! re-renders it from the selected résumé first, since creating, selecting or
//! editing a résumé leaves the last mount behind.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::export::{
    export_filename, export_raster, export_structured, ExportFormat, ExportedFile, PREVIEW_ELEMENT_ID,
};
use crate::models::Resume;
use crate::state::AppState;
use crate::templates::RenderedDocument;

async fn selected_resume(state: &AppState) -> Result<Resume, AppError> {
    let store = state.store.lock().await;
    store.require_user()?;
    store
        .current_resume()
        .cloned()
        .ok_or_else(|| AppError::NotFound("Резюме не выбрано".to_string()))
}

/// Renders `resume` with its template and mounts it as the preview.
async fn mount_preview(state: &AppState, resume: &Resume) -> Result<RenderedDocument, AppError> {
    let document = state
        .renderer
        .render(&resume.profile, resume.template_id.as_str())
        .map_err(|e| AppError::Internal(e.into()))?;
    state.surface.mount(PREVIEW_ELEMENT_ID, document.clone()).await;
    Ok(document)
}

fn download(file: ExportedFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, file.content_type().to_string()),
            (header::CONTENT_DISPOSITION, file.content_disposition()),
        ],
        file.bytes,
    )
        .into_response()
}

/// GET /api/v1/editor/preview
///
/// Renders the selected résumé with its template and mounts it as `resume-preview`.
pub async fn handle_preview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let resume = selected_resume(&state).await?;
    let document = mount_preview(&state, &resume).await?;
    Ok(Html(document.html))
}

/// POST /api/v1/editor/export/pdf
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<Response, AppError> {
    let guard = state
        .exports
        .try_begin(ExportFormat::Pdf)
        .ok_or(AppError::ExportInProgress("PDF"))?;
    let resume = selected_resume(&state).await?;

    // No preview open means nothing to rasterize.
    state.surface.resolve(PREVIEW_ELEMENT_ID).await?;
    mount_preview(&state, &resume).await?;

    let filename = export_filename(&resume.title, guard.format());
    info!("Exporting résumé {} as {filename}", resume.id);
    let file = export_raster(
        &state.surface,
        state.rasterizer.as_ref(),
        PREVIEW_ELEMENT_ID,
        &filename,
    )
    .await?;

    Ok(download(file))
}

/// POST /api/v1/editor/export/docx
pub async fn handle_export_docx(State(state): State<AppState>) -> Result<Response, AppError> {
    let guard = state
        .exports
        .try_begin(ExportFormat::Docx)
        .ok_or(AppError::ExportInProgress("Word"))?;
    let resume = selected_resume(&state).await?;

    let filename = export_filename(&resume.title, guard.format());
    info!("Exporting résumé {} as {filename}", resume.id);
    let file = tokio::task::spawn_blocking(move || {
        export_structured(&resume.profile, resume.template_id.as_str(), &filename)
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))??;

    Ok(download(file))
}
