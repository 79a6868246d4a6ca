//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quiz_core::SessionError;
use serde::Serialize;
use thiserror::Error;

use crate::services::storage::StorageError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Session(SessionError::Finished) => {
                (StatusCode::CONFLICT, "session_finished")
            }
            ApiError::Session(SessionError::BankMismatch { .. }) => {
                (StatusCode::CONFLICT, "bank_mismatch")
            }
            ApiError::Session(SessionError::EmptyBank) => {
                (StatusCode::SERVICE_UNAVAILABLE, "empty_bank")
            }
            ApiError::Session(SessionError::EmptySprint) => {
                (StatusCode::BAD_REQUEST, "bad_request")
            }
            ApiError::Storage(StorageError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
