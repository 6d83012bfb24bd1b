//! Per-request captures and the log lines rendered from them.
//!
//! A [`RequestSnapshot`] is taken before the request is handed downstream and
//! a [`ResponseSnapshot`] after the downstream chain has produced its
//! response. Both are plain values owned by a single middleware invocation;
//! nothing here is shared between requests.

use axum::http::{header::HOST, request::Parts, Method, StatusCode};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use crate::timestamp::{format_local, LOG_LINE_FORMAT};

/// Inbound request as seen by the logging middleware.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    /// HTTP method
    pub method: Method,
    /// Scheme, host, path and query
    pub url: String,
    /// Captured body text (empty when no length was declared)
    pub body: String,
    /// Wall-clock time the request entered the middleware
    pub received_at: DateTime<Utc>,
    /// Monotonic start used for duration measurement
    pub started: Instant,
}

impl RequestSnapshot {
    /// Capture method and URL from request parts.
    ///
    /// `received_at` and `started` are taken by the caller before the body
    /// is read, so body buffering counts towards the measured duration.
    #[must_use]
    pub fn from_parts(
        parts: &Parts,
        body: String,
        received_at: DateTime<Utc>,
        started: Instant,
    ) -> Self {
        Self {
            method: parts.method.clone(),
            url: request_url(parts),
            body,
            received_at,
            started,
        }
    }
}

/// Outbound response as produced by the downstream chain.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    /// Response status
    pub status: StatusCode,
    /// Captured body text
    pub body: String,
    /// Wall-clock time the response was captured
    pub completed_at: DateTime<Utc>,
    /// Monotonic end used for duration measurement
    pub finished: Instant,
}

impl ResponseSnapshot {
    /// Capture a response, stopping the clock now.
    #[must_use]
    pub fn new(status: StatusCode, body: String) -> Self {
        Self {
            status,
            body,
            completed_at: Utc::now(),
            finished: Instant::now(),
        }
    }
}

/// One line destined for the request log sink.
#[derive(Debug, Clone, Copy)]
pub enum LogEntry<'a> {
    /// Method, URL and body of the inbound request.
    Request(&'a RequestSnapshot),
    /// Status and body of the outbound response.
    Response(&'a ResponseSnapshot),
    /// Elapsed time between the two snapshots.
    Duration {
        /// The request being timed
        request: &'a RequestSnapshot,
        /// The response that closed it
        response: &'a ResponseSnapshot,
    },
}

impl LogEntry<'_> {
    /// Instant the entry is stamped with.
    #[must_use]
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Request(request) => request.received_at,
            Self::Response(response) | Self::Duration { response, .. } => response.completed_at,
        }
    }

    /// Render as `dd/MM/yyyy hh:mm:ss tt: <message>`.
    #[must_use]
    pub fn render(&self) -> String {
        let stamp = format_local(self.at(), LOG_LINE_FORMAT);
        match self {
            Self::Request(request) => format!(
                "{stamp}: Request: {} {} | Body: {}",
                request.method, request.url, request.body
            ),
            Self::Response(response) => format!(
                "{stamp}: Response: {} | Body: {}",
                response.status.as_u16(),
                response.body
            ),
            Self::Duration { request, response } => format!(
                "{stamp}: Duration: {} ms | {} {}",
                elapsed(request, response).as_millis(),
                request.method,
                request.url
            ),
        }
    }
}

/// Time between entering the middleware and capturing the response.
#[must_use]
pub fn elapsed(request: &RequestSnapshot, response: &ResponseSnapshot) -> Duration {
    response.finished.saturating_duration_since(request.started)
}

/// Rebuild the absolute URL of a request.
///
/// Servers usually receive origin-form targets (`/path?query`), so the
/// authority falls back to the `Host` header and the scheme to `http`.
#[must_use]
pub fn request_url(parts: &Parts) -> String {
    let scheme = parts.uri.scheme_str().unwrap_or("http");
    let host = parts
        .uri
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| parts.headers.get(HOST).and_then(|h| h.to_str().ok()))
        .unwrap_or_default();
    let path = parts
        .uri
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());

    format!("{scheme}://{host}{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::TimeZone;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        match builder.body(()) {
            Ok(request) => request.into_parts().0,
            Err(e) => unreachable!("test request is valid: {e}"),
        }
    }

    fn fixed(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        match Utc.with_ymd_and_hms(2024, 5, 1, h, m, s) {
            chrono::LocalResult::Single(t) => t,
            _ => unreachable!("valid test timestamp"),
        }
    }

    #[test]
    fn test_url_from_host_header() {
        let parts = parts(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/validate?dry=1")
                .header(HOST, "localhost:8080"),
        );
        assert_eq!(request_url(&parts), "http://localhost:8080/api/v1/validate?dry=1");
    }

    #[test]
    fn test_url_from_absolute_uri() {
        let parts = parts(Request::builder().uri("https://example.com/a/b"));
        assert_eq!(request_url(&parts), "https://example.com/a/b");
    }

    #[test]
    fn test_url_without_host() {
        let parts = parts(Request::builder().uri("/health"));
        assert_eq!(request_url(&parts), "http:///health");
    }

    #[test]
    fn test_render_lines() {
        let started = Instant::now();
        let request = RequestSnapshot {
            method: Method::POST,
            url: "http://localhost/api/v1/validate".to_string(),
            body: r#"{"rowCount":1}"#.to_string(),
            received_at: fixed(4, 0, 0),
            started,
        };
        let response = ResponseSnapshot {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"status":"Error"}"#.to_string(),
            completed_at: fixed(4, 0, 1),
            finished: started + Duration::from_millis(42),
        };

        assert_eq!(
            LogEntry::Request(&request).render(),
            r#"01/05/2024 09:30:00 AM: Request: POST http://localhost/api/v1/validate | Body: {"rowCount":1}"#
        );
        assert_eq!(
            LogEntry::Response(&response).render(),
            r#"01/05/2024 09:30:01 AM: Response: 400 | Body: {"status":"Error"}"#
        );
        assert_eq!(
            LogEntry::Duration {
                request: &request,
                response: &response,
            }
            .render(),
            "01/05/2024 09:30:01 AM: Duration: 42 ms | POST http://localhost/api/v1/validate"
        );
    }
}
