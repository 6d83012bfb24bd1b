//! HTTP API: the validation endpoint, health check, docs and middleware.

pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod server;
