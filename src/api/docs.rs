//! OpenAPI documentation for the REST API.

use utoipa::OpenApi;

use crate::api::handlers;

/// OpenAPI documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::validate::validate_request,
        handlers::health::health_check,
    ),
    components(schemas(
        crate::api::models::ValidationRequest,
        crate::api::models::ValidationResponse,
        crate::api::models::ValidationStatus,
        crate::api::models::HealthResponse,
        crate::api::models::ErrorResponse,
    )),
    tags(
        (name = "Validation", description = "Payload validation"),
        (name = "Health", description = "Health check endpoints"),
    ),
    info(
        title = "Payload Validator API",
        version = "1.0.0",
        description = "Field-level payload validation with request/response audit logging",
    )
)]
pub struct ApiDoc;
