//! API error types with structured JSON responses.
//!
//! This is the only place where the processing error taxonomy meets HTTP:
//! invalid input becomes a client error, collaborator failures become
//! server errors carrying the failure description.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::ExtractError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    InvalidDocument(String),
    #[error("{message}")]
    Extraction { code: &'static str, message: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::InvalidDocument(detail) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", detail)
            }
            ApiError::Extraction { code, message } => {
                tracing::error!(code, message, "extraction failed");
                (StatusCode::INTERNAL_SERVER_ERROR, code, message)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", detail)
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::InvalidInput(msg) => ApiError::InvalidDocument(msg),
            other => ApiError::Extraction {
                code: other.code(),
                message: other.to_string(),
            },
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
