use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::export::ExportError;
use crate::storage::StorageError;
use crate::store::{FieldError, StoreError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Export failed: {0:#}")]
    ExportFailed(anyhow::Error),

    #[error("Validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("Authentication failed")]
    AuthFailed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Profile required")]
    ProfileRequired,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Export already in progress: {0}")]
    ExportInProgress(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::ElementNotFound(id) => AppError::ElementNotFound(id),
            ExportError::ExportFailed(cause) => AppError::ExportFailed(cause),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Auth(_) => AppError::AuthFailed,
            StoreError::Unauthorized => AppError::Unauthorized,
            StoreError::ProfileRequired => AppError::ProfileRequired,
            StoreError::NotFound(id) => AppError::NotFound(format!("Резюме {id} не найдено")),
            StoreError::Validation(fields) => AppError::ValidationFailed(fields),
            StoreError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;
        let (status, code, message) = match &self {
            AppError::ElementNotFound(id) => {
                tracing::warn!("Export target '{id}' is not mounted");
                (
                    StatusCode::CONFLICT,
                    "ELEMENT_NOT_FOUND",
                    "Элемент для экспорта не найден".to_string(),
                )
            }
            AppError::ExportFailed(e) => {
                tracing::error!("Export failed: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "Не удалось создать файл".to_string(),
                )
            }
            AppError::ValidationFailed(fields) => {
                details = Some(json!(fields));
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Проверьте заполнение формы".to_string(),
                )
            }
            AppError::AuthFailed => (
                StatusCode::UNAUTHORIZED,
                "AUTH_FAILED",
                "Неверный email или пароль".to_string(),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::ProfileRequired => (
                StatusCode::CONFLICT,
                "PROFILE_REQUIRED",
                "Сначала заполните профиль".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ExportInProgress(format) => (
                StatusCode::CONFLICT,
                "EXPORT_IN_PROGRESS",
                format!("Экспорт {format} уже выполняется"),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["fields"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
