//! Configuration management for the payload validation service.
//!
//! This module handles loading and validating configuration from environment
//! variables using the `dotenvy` crate. All operations return
//! [`ServiceResult`] for comprehensive error handling.
//!
//! ## Environment Variables
//!
//! Optional (with defaults):
//! - `HOST`: Bind address (default: "0.0.0.0")
//! - `PORT`: Bind port (default: 8080)
//! - `REQUEST_LOG_SINK`: `tracing` or `file` (default: "tracing")
//! - `REQUEST_LOG_DIR`: Directory for the file sink (default: "Logs")
//! - `REQUEST_LOG_MAX_BYTES`: Size at which log files roll (default: 5 MiB)
//! - `MAX_CAPTURE_BYTES`: Largest request body buffered for logging (default: 2 MiB)
//! - `CORS_ORIGINS`: Comma-separated allowed origins (default: any)
//! - `ENABLE_DOCS`: Serve Swagger UI at `/swagger-ui` (default: false)
//! - `RUST_LOG`, `LOG_JSON`, `LOG_FILE`: Read by `main` for tracing setup
//!
//! ## Example
//!
//! ```no_run
//! use payload_validator::config::Config;
//! use payload_validator::error::ServiceResult;
//!
//! # fn main() -> ServiceResult<()> {
//! let config = Config::from_env()?;
//! println!("Listening on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use crate::error::{ServiceError, ServiceResult};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default size at which request log files roll over.
pub const DEFAULT_REQUEST_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default largest request body the logging middleware will buffer.
pub const DEFAULT_MAX_CAPTURE_BYTES: usize = 2 * 1024 * 1024;

/// Where request log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Through the tracing subscriber.
    Tracing,
    /// Straight to dated, size-rolled files.
    File,
}

impl FromStr for SinkKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracing" => Ok(Self::Tracing),
            "file" => Ok(Self::File),
            other => Err(ServiceError::config(
                format!("REQUEST_LOG_SINK must be 'tracing' or 'file', got: {other}"),
                None,
            )),
        }
    }
}

/// Main configuration struct for the service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind
    host: String,

    /// Port to bind
    port: u16,

    /// Request log destination
    request_log_sink: SinkKind,

    /// Directory for the file sink
    request_log_dir: PathBuf,

    /// Roll-over size for the file sink
    request_log_max_bytes: u64,

    /// Request body capture limit
    max_capture_bytes: usize,

    /// Allowed CORS origins; empty means any
    cors_origins: Vec<String>,

    /// Serve Swagger UI
    enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_log_sink: SinkKind::Tracing,
            request_log_dir: PathBuf::from("Logs"),
            request_log_max_bytes: DEFAULT_REQUEST_LOG_MAX_BYTES,
            max_capture_bytes: DEFAULT_MAX_CAPTURE_BYTES,
            cors_origins: Vec::new(),
            enable_docs: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This function:
    /// 1. Loads `.env` file using `dotenvy` (if present)
    /// 2. Reads and validates all environment variables
    /// 3. Applies defaults for unset variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed.
    pub fn from_env() -> ServiceResult<Self> {
        // Load .env file if present (ignore error if file doesn't exist)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but malformed.
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);

        let port = parse_or(&lookup, "PORT", defaults.port, "PORT must be a valid port number")?;

        let request_log_sink = match lookup("REQUEST_LOG_SINK") {
            Some(value) => value.parse()?,
            None => defaults.request_log_sink,
        };

        let request_log_dir = lookup("REQUEST_LOG_DIR")
            .map_or(defaults.request_log_dir, PathBuf::from);

        let request_log_max_bytes = parse_or(
            &lookup,
            "REQUEST_LOG_MAX_BYTES",
            defaults.request_log_max_bytes,
            "REQUEST_LOG_MAX_BYTES must be a valid number",
        )?;
        if request_log_max_bytes == 0 {
            return Err(ServiceError::config(
                "REQUEST_LOG_MAX_BYTES must be greater than 0",
                None,
            ));
        }

        let max_capture_bytes = parse_or(
            &lookup,
            "MAX_CAPTURE_BYTES",
            defaults.max_capture_bytes,
            "MAX_CAPTURE_BYTES must be a valid number",
        )?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let enable_docs = parse_or(
            &lookup,
            "ENABLE_DOCS",
            defaults.enable_docs,
            "ENABLE_DOCS must be 'true' or 'false'",
        )?;

        Ok(Self {
            host,
            port,
            request_log_sink,
            request_log_dir,
            request_log_max_bytes,
            max_capture_bytes,
            cors_origins,
            enable_docs,
        })
    }

    /// Override the bind host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the bind port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the bind host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the bind port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// `host:port` string suitable for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the request log sink kind.
    #[must_use]
    pub const fn request_log_sink(&self) -> SinkKind {
        self.request_log_sink
    }

    /// Get the file sink directory.
    #[must_use]
    pub const fn request_log_dir(&self) -> &PathBuf {
        &self.request_log_dir
    }

    /// Get the file sink roll-over size.
    #[must_use]
    pub const fn request_log_max_bytes(&self) -> u64 {
        self.request_log_max_bytes
    }

    /// Get the request body capture limit.
    #[must_use]
    pub const fn max_capture_bytes(&self) -> usize {
        self.max_capture_bytes
    }

    /// Get the allowed CORS origins.
    #[must_use]
    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    /// Check if Swagger UI is enabled.
    #[must_use]
    pub const fn enable_docs(&self) -> bool {
        self.enable_docs
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T, message: &str) -> ServiceResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ServiceError::config(format!("{message}, got: {raw}"), Some(Box::new(e)))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ServiceResult<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = load(&[]);
        assert!(config.is_ok());

        if let Ok(config) = config {
            assert_eq!(config.bind_address(), "0.0.0.0:8080");
            assert_eq!(config.request_log_sink(), SinkKind::Tracing);
            assert_eq!(config.request_log_dir(), &PathBuf::from("Logs"));
            assert_eq!(config.request_log_max_bytes(), 5 * 1024 * 1024);
            assert_eq!(config.max_capture_bytes(), 2 * 1024 * 1024);
            assert!(config.cors_origins().is_empty());
            assert!(!config.enable_docs());
        }
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("REQUEST_LOG_SINK", "File"),
            ("REQUEST_LOG_DIR", "/var/log/validator"),
            ("CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("ENABLE_DOCS", "true"),
        ]);

        if let Ok(config) = config {
            assert_eq!(config.bind_address(), "127.0.0.1:9000");
            assert_eq!(config.request_log_sink(), SinkKind::File);
            assert_eq!(config.request_log_dir(), &PathBuf::from("/var/log/validator"));
            assert_eq!(config.cors_origins(), ["https://a.example", "https://b.example"]);
            assert!(config.enable_docs());
        } else {
            unreachable!("valid overrides must load");
        }
    }

    #[test]
    fn test_invalid_port() {
        let result = load(&[("PORT", "eighty")]);
        assert!(matches!(result, Err(ServiceError::ConfigError { .. })));
    }

    #[test]
    fn test_unknown_sink() {
        let result = load(&[("REQUEST_LOG_SINK", "syslog")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_docs_flag() {
        let result = load(&[("ENABLE_DOCS", "yes")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_roll_size_rejected() {
        let result = load(&[("REQUEST_LOG_MAX_BYTES", "0")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_host("localhost").with_port(3000);
        assert_eq!(config.bind_address(), "localhost:3000");
    }
}
