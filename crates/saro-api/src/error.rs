//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Bodies are flat JSON objects, `{"error": "<message>", "code": "<CODE>"}`,
//! so clients can keep testing for an `error` key. Internal error details are
//! never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Record not found (404). The message names the record family.
    #[error("{0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Not-found error for a record family, e.g. `AppError::not_found("Run")`
    /// renders as "Run not found".
    pub fn not_found(kind: &str) -> Self {
        Self::NotFound(format!("{kind} not found"))
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert saro-core validation errors to API errors.
impl From<saro_core::ValidationError> for AppError {
    fn from(err: saro_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Convert saro-core domain errors to API errors.
impl From<saro_core::SaroError> for AppError {
    fn from(err: saro_core::SaroError) -> Self {
        match err {
            saro_core::SaroError::Validation(v) => v.into(),
            saro_core::SaroError::NotFound { kind, id } => {
                Self::NotFound(format!("{kind} not found: {id}"))
            }
            saro_core::SaroError::Json(e) => Self::Internal(e.to_string()),
        }
    }
}
