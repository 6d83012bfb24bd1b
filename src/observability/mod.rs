//! Observability and structured logging infrastructure.
//!
//! This module sets up the tracing subscriber that receives both the
//! service's own diagnostics and, with the default [`TracingSink`], every
//! request log line.
//!
//! # Features
//!
//! - **Structured Logging**: Key-value pairs for machine-parseable logs
//! - **Fixed-zone timestamps**: Event times rendered in UTC+05:30 as
//!   `dd-MM-yyyy hh:mm:ss tt`, independent of the host time zone
//! - **Multiple Formats**: Console (pretty/JSON) and file output
//! - **Environment Filtering**: RUST_LOG variable support
//!
//! # Environment Configuration
//!
//! ```bash
//! # Set log level for all modules
//! RUST_LOG=debug cargo run -- serve
//!
//! # Only request/response lines
//! RUST_LOG=request_response=info cargo run -- serve
//!
//! # Enable JSON output for production
//! LOG_JSON=true cargo run -- serve
//!
//! # Also write logs to a daily-rotated file
//! LOG_FILE=./Logs/service.log cargo run -- serve
//! ```
//!
//! [`TracingSink`]: crate::sink::TracingSink

use chrono::Utc;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::timestamp::{format_local, CONSOLE_FORMAT};

/// Timer rendering event timestamps in the fixed UTC+05:30 zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct IstTimer;

impl FormatTime for IstTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_local(Utc::now(), CONSOLE_FORMAT))
    }
}

/// Initialize the tracing subscriber with configurable output formats.
///
/// # Arguments
///
/// * `log_level` - Optional log level override (e.g., "debug", "info").
///                 RUST_LOG takes precedence when set.
/// * `log_file` - Optional file path for log output. Enables daily log rotation.
/// * `json_output` - If true, outputs JSON format suitable for log aggregation.
///                   If false, uses pretty-printed human-readable format.
///
/// # Defaults
///
/// When no configuration is provided:
/// - Level: `info` for this crate and request lines, `warn` for dependencies
/// - Format: Pretty-printed with colors and timestamps
/// - Output: Console only (no file)
///
/// The returned guard flushes the file writer on drop; hold it until
/// shutdown or trailing file output is lost.
///
/// # Errors
///
/// Returns an error if:
/// - The log file's directory cannot be created
/// - A global subscriber is already installed
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        // Default: info for our app and request lines, warn for dependencies
        EnvFilter::new("payload_validator=info,request_response=info,warn")
    };

    let console_layer = if json_output {
        fmt::layer()
            .json()
            .with_timer(IstTimer)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_timer(IstTimer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_ids(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(ref path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file_appender = tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_name().unwrap_or_else(|| OsStr::new("service.log")),
        );

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // File always uses JSON for structured log analysis
        let layer = fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_timer(IstTimer)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed();

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized successfully"
    );

    Ok(guard)
}

/// Initialize tracing with test-specific configuration.
///
/// Use this in test modules to see logging output with
/// `cargo test -- --nocapture`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_timer(IstTimer)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
