use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::CompletionError;
use crate::marketplace::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Completion credentials are absent. Retrying will not help.
    #[error("AI service is not configured")]
    AiNotConfigured,

    /// Network failure, rate limit or non-2xx from the completion service.
    #[error("AI upstream error: {0}")]
    AiUpstream(String),

    /// The completion answered, but not with a valid contract object.
    #[error("AI returned an invalid response: {0}")]
    AiInvalidResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::NotConfigured => AppError::AiNotConfigured,
            CompletionError::Upstream(e) => AppError::AiUpstream(e.to_string()),
            CompletionError::InvalidResponse(msg) => AppError::AiInvalidResponse(msg),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::Database(e),
            // Callers that can recover from duplicates match on StoreError directly.
            StoreError::Duplicate => {
                AppError::Validation("Record already exists".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::AiNotConfigured => {
                tracing::error!("Match requested but GEMINI_API_KEY is not set");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "AI_NOT_CONFIGURED",
                    "The AI service is not configured. Set GEMINI_API_KEY and restart.".to_string(),
                )
            }
            AppError::AiUpstream(msg) => {
                tracing::warn!("AI upstream error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_UPSTREAM_ERROR",
                    "The AI service failed to answer. Please try again.".to_string(),
                )
            }
            AppError::AiInvalidResponse(msg) => {
                tracing::warn!("AI invalid response: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AI_INVALID_RESPONSE",
                    "The AI analysis could not be generated. Please try again.".to_string(),
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
