//! CLI entry point for the payload validation service.
//!
//! # Architecture Flow
//!
//! ```text
//! main.rs (Runtime + tracing initialization)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)        → Load environment variables
//! 2. Sink Layer (src/sink/)              → Build the request log sink
//! 3. API Layer (src/api/)                → Router, middleware, handlers
//!    └ Logging middleware                → Capture, delegate, capture, replay
//!    └ Validation (src/validation.rs)    → Field rules
//! ```
//!
//! All errors bubble up with context via `ServiceResult<T>`.

use payload_validator::{cli, observability};
use tracing::error;

/// Entry point for the payload validation service.
///
/// Initializes:
/// - Tokio async runtime (via `#[tokio::main]`)
/// - Structured logging with tracing
/// - Environment-based filtering (RUST_LOG, LOG_JSON, LOG_FILE)
///
/// Then delegates to the CLI module.
#[tokio::main]
async fn main() {
    // .env may carry the logging variables too
    dotenvy::dotenv().ok();

    let log_level = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let json_output = std::env::var("LOG_JSON")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    // Held until exit so the file writer flushes
    let guard = match observability::init_tracing(log_level, log_file, json_output) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e}");
        drop(guard);
        std::process::exit(1);
    }
}
