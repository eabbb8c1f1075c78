use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::injector::InsertError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("No insertion target")]
    NoInsertTarget,

    #[error("Insertion failed: {0}")]
    Insertion(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            corrupt @ StorageError::Corrupt { .. } => AppError::Internal(corrupt.into()),
        }
    }
}

impl From<InsertError> for AppError {
    fn from(e: InsertError) -> Self {
        match e {
            InsertError::NoTarget => AppError::NoInsertTarget,
            other => AppError::Insertion(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::StorageUnavailable(msg) => {
                tracing::error!("Storage unavailable: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    "Storage is unavailable, refresh and retry".to_string(),
                )
            }
            AppError::NoInsertTarget => (
                StatusCode::CONFLICT,
                "NO_INSERT_TARGET",
                "No input field is available to receive the prompt".to_string(),
            ),
            AppError::Insertion(msg) => {
                tracing::error!("Insertion error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "INSERTION_FAILED",
                    "The prompt could not be inserted".to_string(),
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

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
