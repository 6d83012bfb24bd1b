//! Request log sinks.
//!
//! The logging middleware only needs one capability from its output: append a
//! line of text. [`LogSink`] is that capability. A single sink is shared by
//! every in-flight request, so implementations must serialise their own
//! writes.
//!
//! | Sink | Output |
//! |---|---|
//! | [`TracingSink`] | `info` events on the `request_response` target |
//! | [`RollingFileSink`] | dated, size-rolled files under a log directory |
//! | [`MemorySink`] | an in-memory list, for tests and embedding |

mod file;
mod logger;
mod memory;

pub use file::RollingFileSink;
pub use logger::{TracingSink, REQUEST_LOG_TARGET};
pub use memory::MemorySink;

use std::sync::Arc;

use crate::config::{Config, SinkKind};
use crate::error::ServiceResult;

/// Result of a single append.
pub type SinkResult<T> = ServiceResult<T>;

/// Something that accepts request log lines.
pub trait LogSink: Send + Sync {
    /// Append one line. `line` carries no trailing newline.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SinkError`](crate::error::ServiceError::SinkError)
    /// when the line could not be written.
    fn append(&self, line: &str) -> SinkResult<()>;
}

/// A sink shared across requests.
pub type SharedSink = Arc<dyn LogSink>;

/// Build the sink selected by `config`.
///
/// # Errors
///
/// Returns an error if the file sink's directory cannot be created.
pub fn from_config(config: &Config) -> ServiceResult<SharedSink> {
    let sink: SharedSink = match config.request_log_sink() {
        SinkKind::Tracing => Arc::new(TracingSink),
        SinkKind::File => Arc::new(RollingFileSink::new(
            config.request_log_dir(),
            config.request_log_max_bytes(),
        )?),
    };
    Ok(sink)
}
