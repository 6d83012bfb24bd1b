//! # Payload Validator
//!
//! A small HTTP service that validates listing request payloads and records
//! every request and response to an audit log.
//!
//! ## Features
//!
//! - **Field validation** of `secCode`, `rowCount`, `pageIndex` and `dtDate`
//! - **Request/response logging middleware** that captures both bodies
//!   without disturbing what the handler reads or what the client receives
//! - **Fixed-zone timestamps** in UTC+05:30, independent of host settings
//! - **Pluggable log sinks**: tracing, dated size-rolled files, in-memory
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! 1. **Timestamp Layer** ([`timestamp`]) - UTC+05:30 rendering
//! 2. **Capture Layer** ([`capture`]) - buffer a body, read it, replay it
//! 3. **Snapshot Layer** ([`snapshot`]) - per-request captures and log lines
//! 4. **Sink Layer** ([`sink`]) - where log lines go
//! 5. **API Layer** ([`api`]) - router, logging middleware, handlers
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the service
//! cargo run --release -- serve
//!
//! # Validate a payload file
//! cargo run --release -- check request.json
//! ```
//!
//! ### Embedding the router
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use payload_validator::{api::server::build_router, app_state::AppState, config::Config, sink::MemorySink};
//!
//! let config = Config::default();
//! let sink = MemorySink::new();
//! let app = build_router(AppState::new(Arc::new(sink.clone()), &config), &config);
//! # let _ = app;
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`error::ServiceResult<T>`](error::ServiceResult).
//! Request log write failures are never surfaced to HTTP clients.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod app_state;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod sink;
pub mod snapshot;
pub mod timestamp;
pub mod validation;
