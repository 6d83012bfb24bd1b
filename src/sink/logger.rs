//! Sink that forwards lines to the tracing subscriber.

use tracing::info;

use super::{LogSink, SinkResult};

/// Target used for request log events, so they can be filtered with
/// `RUST_LOG=request_response=info`.
pub const REQUEST_LOG_TARGET: &str = "request_response";

/// Emits each line as an `info` event.
///
/// Where the line ends up (console, rolling file, JSON) is decided by the
/// subscriber installed in [`observability`](crate::observability).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn append(&self, line: &str) -> SinkResult<()> {
        info!(target: REQUEST_LOG_TARGET, "{line}");
        Ok(())
    }
}
