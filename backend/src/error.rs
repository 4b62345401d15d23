//! Unified error handling for the backend API.
//!
//! This module provides a centralized error type that implements
//! `IntoResponse`, allowing handlers to use the `?` operator naturally while
//! returning appropriate HTTP status codes and error messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::api::ErrorResponse;
use thiserror::Error;

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request payload failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The requested slot collides with an existing booking
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A third-party provider call failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Generic internal error
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a not found error with a custom message
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(errors.to_string()),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
            ApiError::Provider(msg) => {
                tracing::error!("Provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream provider error".to_string(),
                    Some(msg.clone()),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
