//! Error types for the payload validation service.
//!
//! This module provides a unified error type [`ServiceError`] for the failures
//! that can stop the service from starting or serving: bad configuration,
//! an unusable request log sink, and listener/server failures.
//!
//! # Design
//!
//! The error hierarchy is organized by layer:
//! - [`ServiceError::ConfigError`]: Configuration and environment issues
//! - [`ServiceError::SinkError`]: Request log sink I/O failures
//! - [`ServiceError::ServerError`]: Socket binding and HTTP server failures
//! - [`ServiceError::ValidationError`]: A checked payload broke field rules
//!
//! Sink errors raised while a request is in flight never reach this type's
//! callers: the logging middleware degrades them to a warning.
//!
//! # Example
//!
//! ```
//! use payload_validator::error::{ServiceError, ServiceResult};
//!
//! fn validate_port(port: u16) -> ServiceResult<()> {
//!     if port == 0 {
//!         return Err(ServiceError::config("port cannot be zero", None));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Result type alias using [`ServiceError`].
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Boxed source error carried by [`ServiceError`] variants.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Unified error type for the payload validation service.
#[derive(Debug)]
pub enum ServiceError {
    /// Configuration or environment variable errors.
    ///
    /// Variants include:
    /// - Non-numeric port or size values
    /// - Unknown request log sink names
    /// - Malformed boolean flags
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// Request log sink errors.
    ///
    /// Variants include:
    /// - Log directory cannot be created
    /// - Log file cannot be opened or written
    SinkError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// HTTP server errors.
    ///
    /// Variants include:
    /// - Address already in use
    /// - Listener accept failures
    ServerError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<BoxedSource>,
    },

    /// A payload checked outside the HTTP path failed validation.
    ValidationError {
        /// Human-readable error message
        message: String,
        /// Individual rule violations, in rule order
        violations: Vec<String>,
    },
}

impl ServiceError {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use payload_validator::error::ServiceError;
    ///
    /// let err = ServiceError::config("PORT must be a valid port number", None);
    /// assert!(matches!(err, ServiceError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new sink error.
    ///
    /// # Example
    ///
    /// ```
    /// use payload_validator::error::ServiceError;
    ///
    /// let err = ServiceError::sink("disk full", None);
    /// assert!(matches!(err, ServiceError::SinkError { .. }));
    /// ```
    #[must_use]
    pub fn sink(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::SinkError {
            message: message.into(),
            source,
        }
    }

    /// Create a new server error.
    #[must_use]
    pub fn server(message: impl Into<String>, source: Option<BoxedSource>) -> Self {
        Self::ServerError {
            message: message.into(),
            source,
        }
    }

    /// Create a new validation error from rule violations.
    #[must_use]
    pub fn validation(message: impl Into<String>, violations: Vec<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            violations,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::SinkError { message, .. } => write!(f, "Log sink error: {message}"),
            Self::ServerError { message, .. } => write!(f, "Server error: {message}"),
            Self::ValidationError { message, .. } => write!(f, "Validation failed: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError { source, .. }
            | Self::SinkError { source, .. }
            | Self::ServerError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
            Self::ValidationError { .. } => None,
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        Self::SinkError {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
