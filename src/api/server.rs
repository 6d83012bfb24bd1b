//! Axum server setup and routing.

use axum::http::HeaderValue;
use axum::{middleware, routing::{get, post}, Router};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{docs::ApiDoc, handlers, middleware as api_middleware};
use crate::app_state::AppState;
use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

/// Routes under `/api/v1`, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/validate", post(handlers::validate::validate_request))
        .route("/health", get(handlers::health::health_check))
}

/// Full application router with the middleware stack applied.
///
/// Layers, outermost first: tracing spans, compression, request logging,
/// CORS, panic recovery. Preflight answers and panic 500s are produced
/// inside the logging layer, so they are logged like any other response.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config.cors_origins());

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn_with_state(
            state.logger.clone(),
            api_middleware::logging::log_requests,
        ))
        .layer(cors)
        .layer(CatchPanicLayer::new());

    let mut app = Router::new().nest("/api/v1", api_routes());

    if config.enable_docs() {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app.layer(middleware_stack).with_state(state)
}

/// Run the Axum API server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(config: Config, state: AppState) -> ServiceResult<()> {
    let app = build_router(state, &config);
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ServiceError::server(format!("cannot bind {addr}"), Some(Box::new(e)))
    })?;

    info!(
        addr = %addr,
        docs = config.enable_docs(),
        sink = ?config.request_log_sink(),
        "Starting API server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServiceError::server("server terminated", Some(Box::new(e))))?;

    info!("Server stopped");
    Ok(())
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(header) => Some(header),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer.allow_origin(allowed)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
