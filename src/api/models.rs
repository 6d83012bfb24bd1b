//! API request and response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::validation::ValidationRequest;

/// Message returned when every rule passes.
pub const VALIDATION_PASSED: &str = "Validation Passed";

/// Outcome tag of a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ValidationStatus {
    /// All rules passed
    Success,
    /// At least one rule failed
    Error,
}

/// Validation endpoint response.
///
/// Exactly one of `message` (on success) or `errors` (on failure) is present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    /// Time the request was handled, `dd/MM/yyyy hh:mm:ss` in UTC+05:30
    #[schema(example = "16/03/2024 02:15:10")]
    pub request_time: String,
    /// Outcome tag
    pub status: ValidationStatus,
    /// Success message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Rule violations, in rule order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ValidationResponse {
    /// Build the response for a list of violations.
    #[must_use]
    pub fn from_errors(request_time: String, errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self {
                request_time,
                status: ValidationStatus::Success,
                message: Some(VALIDATION_PASSED.to_string()),
                errors,
            }
        } else {
            Self {
                request_time,
                status: ValidationStatus::Error,
                message: None,
                errors,
            }
        }
    }

    /// Whether validation passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Success
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
    /// Application version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Error response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type
    pub error: String,
    /// Human-readable message
    pub message: String,
}
