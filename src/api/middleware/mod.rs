//! HTTP middleware and error mapping.

pub mod error;
pub mod logging;
