// ABOUTME: Route-boundary error type and its HTTP translation
// ABOUTME: Maps auth, validation, not-found, generation and internal failures to status + JSON body

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kroolo_ideate::ProjectError;
use kroolo_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Project workflow failures surface their cause under `details`
    #[error("{context}: {source}")]
    Project {
        context: &'static str,
        source: ProjectError,
    },

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    code: &'static str,
    request_id: String,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::Project { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "GENERATION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message; internal causes never leak
    fn to_user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized: Invalid API key".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound => "Epic not found".to_string(),
            AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Project { context, .. } => context.to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Project { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn project(context: &'static str, source: ProjectError) -> Self {
        Self::Project { context, source }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(msg) => {
                AppError::Validation(format!("Epic validation failed: {}", msg))
            }
            StorageError::NotFound => AppError::NotFound,
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();

        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = ?err,
                    "Internal server error occurred"
                );
            }
            AppError::Project { context, source } => {
                error!(
                    request_id = %request_id,
                    error = %source,
                    "{}", context
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let body = ErrorResponse {
            error: self.to_user_message(),
            details: self.details(),
            code: error_code,
            request_id,
        };

        (status_code, Json(body)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;
