//! Payload validation endpoint.

use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use chrono::Utc;
use tracing::{info, instrument};

use crate::api::models::{ValidationRequest, ValidationResponse};
use crate::timestamp::{format_local, RESPONSE_TIME_FORMAT};
use crate::validation::validate;

#[utoipa::path(
    post,
    path = "/api/v1/validate",
    request_body = ValidationRequest,
    responses(
        (status = 200, description = "All rules passed", body = ValidationResponse),
        (status = 400, description = "Rule violations or malformed payload", body = ValidationResponse)
    ),
    tag = "Validation"
)]
/// Validates a listing request payload.
///
/// A payload that cannot be parsed is reported the same way as a rule
/// violation: 400 with the parser's message as the only error.
#[instrument(skip_all)]
pub async fn validate_request(
    payload: Result<Json<ValidationRequest>, JsonRejection>,
) -> (StatusCode, Json<ValidationResponse>) {
    let now = Utc::now();
    let request_time = format_local(now, RESPONSE_TIME_FORMAT);

    let errors = match payload {
        Ok(Json(request)) => validate(&request, now),
        Err(rejection) => vec![rejection.body_text()],
    };

    let response = ValidationResponse::from_errors(request_time, errors);
    let status = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    info!(
        status = status.as_u16(),
        violations = response.errors.len(),
        "Payload validated"
    );

    (status, Json(response))
}
