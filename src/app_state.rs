//! Shared application state for the API server.

use std::time::SystemTime;

use crate::api::middleware::logging::RequestLogger;
use crate::config::Config;
use crate::sink::SharedSink;

/// Shared application state for API handlers.
///
/// Built once at startup and cloned into every handler; nothing in it is
/// mutated after construction.
#[derive(Clone)]
pub struct AppState {
    /// Request/response logger used by the logging middleware.
    pub logger: RequestLogger,
    /// Application start time for uptime tracking.
    pub start_time: SystemTime,
}

impl AppState {
    /// Create a new AppState instance.
    pub fn new(sink: SharedSink, config: &Config) -> Self {
        Self {
            logger: RequestLogger::new(sink, config.max_capture_bytes()),
            start_time: SystemTime::now(),
        }
    }
}
