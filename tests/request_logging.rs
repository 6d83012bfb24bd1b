//! Integration tests for the request/response logging middleware.
//!
//! These tests drive small routers in-process and check that the middleware
//! is invisible to handlers and clients while writing exactly three lines per
//! request to its sink.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, Request, StatusCode},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use payload_validator::api::middleware::logging::{log_requests, RequestLogger};
use payload_validator::error::{ServiceError, ServiceResult};
use payload_validator::sink::{LogSink, MemorySink, SharedSink};
use futures_util::stream;
use std::io;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

struct FailingSink;

impl LogSink for FailingSink {
    fn append(&self, _line: &str) -> ServiceResult<()> {
        Err(ServiceError::sink("disk full", None))
    }
}

async fn echo(body: String) -> String {
    body
}

async fn created() -> (StatusCode, [(header::HeaderName, &'static str); 1], &'static str) {
    (StatusCode::CREATED, [(header::ETAG, "\"v1\"")], "made it")
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

fn failing_stream() -> Body {
    Body::from_stream(stream::iter(vec![
        Ok(Bytes::from_static(b"partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "stream reset")),
    ]))
}

async fn broken() -> Body {
    failing_stream()
}

fn routes() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/created", get(created))
        .route("/boom", get(boom))
        .route("/broken", get(broken))
        .layer(CatchPanicLayer::new())
}

fn logged(sink: SharedSink, max_body_bytes: usize) -> Router {
    let logger = RequestLogger::new(sink, max_body_bytes);
    routes().layer(middleware::from_fn_with_state(logger, log_requests))
}

fn post_with_length(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn into_parts(response: Response) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, parts.headers, bytes.to_vec())
}

#[tokio::test]
async fn test_handler_reads_full_body_after_capture() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let response = app
        .oneshot(post_with_length("/echo", r#"{"secCode":"AB12"}"#))
        .await
        .unwrap();
    let (status, _, body) = into_parts(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, br#"{"secCode":"AB12"}"#);
}

#[tokio::test]
async fn test_three_entries_in_order() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    app.oneshot(post_with_length("/echo?page=2", "hello"))
        .await
        .unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3, "{lines:#?}");
    assert!(lines[0].ends_with("Request: POST http://localhost/echo?page=2 | Body: hello"));
    assert!(lines[1].ends_with("Response: 200 | Body: hello"));
    assert!(lines[2].contains(": Duration: "));
    assert!(lines[2].ends_with(" ms | POST http://localhost/echo?page=2"));

    // dd/MM/yyyy hh:mm:ss AM: ...
    for line in &lines {
        assert_eq!(&line[2..3], "/");
        assert_eq!(&line[5..6], "/");
        assert!(line[20..].starts_with("AM: ") || line[20..].starts_with("PM: "));
    }
}

#[tokio::test]
async fn test_response_identical_with_and_without_middleware() {
    let sink = MemorySink::new();

    for (method, uri) in [("POST", "/echo"), ("GET", "/created"), ("GET", "/missing")] {
        let build = || {
            let builder = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::HOST, "localhost");
            if method == "POST" {
                builder
                    .header(header::CONTENT_LENGTH, 7)
                    .body(Body::from("payload"))
                    .unwrap()
            } else {
                builder.body(Body::empty()).unwrap()
            }
        };

        let bare = into_parts(routes().oneshot(build()).await.unwrap()).await;
        let wrapped = into_parts(
            logged(Arc::new(sink.clone()), 1024)
                .oneshot(build())
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(bare.0, wrapped.0, "status for {uri}");
        assert_eq!(bare.1, wrapped.1, "headers for {uri}");
        assert_eq!(bare.2, wrapped.2, "body for {uri}");
    }

    assert_eq!(sink.lines().len(), 9);
}

#[tokio::test]
async fn test_body_without_length_passes_through_unlogged() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(header::HOST, "localhost")
        .body(Body::from("streamed"))
        .unwrap();
    let (status, _, body) = into_parts(app.oneshot(request).await.unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"streamed");

    let lines = sink.lines();
    assert!(lines[0].ends_with("| Body: "));
    assert!(lines[1].ends_with("Response: 200 | Body: streamed"));
}

#[tokio::test]
async fn test_empty_body_is_logged_as_empty() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let (status, _, _) = into_parts(app.oneshot(post_with_length("/echo", "")).await.unwrap()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(sink.lines()[0].ends_with("Request: POST http://localhost/echo | Body: "));
}

#[tokio::test]
async fn test_sink_failure_is_invisible_to_client() {
    let app = logged(Arc::new(FailingSink), 1024);

    let response = app
        .oneshot(post_with_length("/echo", "still works"))
        .await
        .unwrap();
    let (status, _, body) = into_parts(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"still works");
}

#[tokio::test]
async fn test_oversized_body_rejected_and_logged() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 8);

    let response = app
        .oneshot(post_with_length("/echo", "far more than eight bytes"))
        .await
        .unwrap();
    let (status, _, body) = into_parts(response).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "payload_too_large");

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Response: 413 | Body: {"));
}

#[tokio::test]
async fn test_panicking_handler_logged_as_server_error() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let request = Request::builder()
        .uri("/boom")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Request: GET http://localhost/boom"));
    assert!(lines[1].contains("Response: 500"));
}

#[tokio::test]
async fn test_failing_response_stream_becomes_logged_server_error() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let request = Request::builder()
        .uri("/broken")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = into_parts(app.oneshot(request).await.unwrap()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "internal_error");

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("Request: GET http://localhost/broken"));
    assert!(lines[1].contains("Response: 500 | Body: {"));
    assert!(!lines[1].contains("partial"));
    assert!(lines[2].ends_with(" ms | GET http://localhost/broken"));
}

#[tokio::test]
async fn test_failing_request_stream_rejected_and_logged() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(header::HOST, "localhost")
        .header(header::CONTENT_LENGTH, 16)
        .body(failing_stream())
        .unwrap();
    let (status, _, body) = into_parts(app.oneshot(request).await.unwrap()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "bad_request");

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with("Request: POST http://localhost/echo | Body: "));
    assert!(lines[1].contains("Response: 400 | Body: {"));
    assert!(lines[2].contains(": Duration: "));
}

#[tokio::test]
async fn test_concurrent_requests_keep_their_own_state() {
    let sink = MemorySink::new();
    let app = logged(Arc::new(sink.clone()), 1024);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let app = app.clone();
        tasks.spawn(async move {
            let body = format!("req-{i}");
            let response = app
                .oneshot(post_with_length(&format!("/echo?id={i}"), &body))
                .await
                .unwrap();
            let (_, _, echoed) = into_parts(response).await;
            (body, echoed)
        });
    }

    while let Some(result) = tasks.join_next().await {
        let (sent, echoed) = result.unwrap();
        assert_eq!(sent.as_bytes(), echoed.as_slice());
    }

    let lines = sink.lines();
    assert_eq!(lines.len(), 32 * 3);

    for i in 0..32 {
        let body_suffix = format!("| Body: req-{i}");
        let url_suffix = format!("/echo?id={i}");

        let request = lines
            .iter()
            .position(|l| l.contains(": Request: ") && l.ends_with(&body_suffix))
            .unwrap();
        let response = lines
            .iter()
            .position(|l| l.contains(": Response: 200 ") && l.ends_with(&body_suffix))
            .unwrap();
        let duration = lines
            .iter()
            .position(|l| l.contains(": Duration: ") && l.ends_with(&url_suffix))
            .unwrap();

        assert!(request < response && response < duration, "request {i} out of order");
    }
}
