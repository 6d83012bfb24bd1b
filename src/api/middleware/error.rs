//! Unified API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::api::models::ErrorResponse;
use crate::capture::BodyCaptureError;

/// API-specific error type.
#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read.
    BadRequest(String),
    /// Request body larger than the capture limit.
    PayloadTooLarge(String),
    /// Internal server error.
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            Self::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg)
            }
            Self::InternalError(msg) => {
                error!(error = %msg, "Internal error in API handler");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<BodyCaptureError> for ApiError {
    fn from(err: BodyCaptureError) -> Self {
        match err {
            BodyCaptureError::TooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            BodyCaptureError::Read { .. } => Self::BadRequest(err.to_string()),
        }
    }
}
