//! Request/response logging middleware.
//!
//! Every request passes through three phases:
//!
//! 1. The request body is buffered, logged with method and URL, and a
//!    replayable copy is put back into the request.
//! 2. The downstream chain runs exactly once.
//! 3. The response body is buffered, logged with the status, and put back
//!    into the response unchanged. A final line records the elapsed time.
//!
//! All per-request data lives in locals of [`log_requests`]; the shared
//! [`RequestLogger`] is read-only. Buffers are owned values, so they are
//! released on every exit path including unwinding.

use axum::{
    extract::{Request, State},
    http::{header::CONTENT_LENGTH, response::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

use crate::api::middleware::error::ApiError;
use crate::capture::{capture_body, CapturedBody};
use crate::sink::SharedSink;
use crate::snapshot::{elapsed, LogEntry, RequestSnapshot, ResponseSnapshot};

/// Upper bound for buffering responses; they are produced in-process.
const RESPONSE_CAPTURE_LIMIT: usize = usize::MAX;

/// Read-only configuration shared by every invocation of [`log_requests`].
#[derive(Clone)]
pub struct RequestLogger {
    sink: SharedSink,
    max_body_bytes: usize,
}

impl RequestLogger {
    /// Create a logger writing to `sink` and buffering request bodies of at
    /// most `max_body_bytes`.
    #[must_use]
    pub fn new(sink: SharedSink, max_body_bytes: usize) -> Self {
        Self {
            sink,
            max_body_bytes,
        }
    }

    /// Request body capture limit.
    #[must_use]
    pub const fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Write one entry, degrading sink failures to a warning.
    fn emit(&self, entry: LogEntry<'_>) {
        if let Err(e) = self.sink.append(&entry.render()) {
            warn!(error = %e, "Failed to write request log entry");
        }
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

/// Logs the request, the response and the elapsed time of every call.
///
/// The client receives exactly the status, headers and body produced
/// downstream. The one exception is a request body that cannot be buffered
/// (declared length over the limit, or a failing stream): it can no longer
/// be replayed, so the chain is skipped and a 413 or 400 is returned and
/// logged instead.
pub async fn log_requests(
    State(logger): State<RequestLogger>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let received_at = Utc::now();

    let (parts, body) = request.into_parts();
    let content_length = declared_length(&parts.headers);

    let (request_body, replay) =
        match capture_body(body, content_length, logger.max_body_bytes).await {
            Ok((text, replay)) => (text, Ok(replay)),
            Err(e) => {
                warn!(error = %e, "Request body could not be captured");
                (String::new(), Err(ApiError::from(e)))
            }
        };

    let request_snapshot = RequestSnapshot::from_parts(&parts, request_body, received_at, started);
    logger.emit(LogEntry::Request(&request_snapshot));

    let response = match replay {
        Ok(replay) => next.run(Request::from_parts(parts, replay)).await,
        Err(rejection) => rejection.into_response(),
    };

    let (response_parts, buffered) = buffer_response(response).await;

    let response_snapshot = ResponseSnapshot::new(response_parts.status, buffered.text());
    logger.emit(LogEntry::Response(&response_snapshot));
    logger.emit(LogEntry::Duration {
        request: &request_snapshot,
        response: &response_snapshot,
    });

    debug!(
        method = %request_snapshot.method,
        url = %request_snapshot.url,
        status = response_snapshot.status.as_u16(),
        duration_ms = elapsed(&request_snapshot, &response_snapshot).as_millis(),
        "Request completed"
    );

    Response::from_parts(response_parts, buffered.into_body())
}

/// Split a response and buffer its body.
///
/// A body that fails mid-stream cannot be delivered intact, so it is
/// replaced by a 500 error response.
async fn buffer_response(response: Response) -> (Parts, CapturedBody) {
    let (parts, body) = response.into_parts();
    match CapturedBody::read(body, RESPONSE_CAPTURE_LIMIT).await {
        Ok(buffered) => (parts, buffered),
        Err(e) => {
            let (parts, body) = ApiError::InternalError(e.to_string())
                .into_response()
                .into_parts();
            let buffered = CapturedBody::read(body, RESPONSE_CAPTURE_LIMIT)
                .await
                .unwrap_or_default();
            (parts, buffered)
        }
    }
}

/// Parsed `Content-Length`, if present and numeric.
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}
