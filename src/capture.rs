//! Body capture with replay.
//!
//! An HTTP body in axum is a one-shot stream: once read, it is gone. To log a
//! body and still hand it to the next consumer, the whole body is first
//! buffered into [`Bytes`] and a fresh [`Body`] is rebuilt from that buffer.
//! Cloning [`Bytes`] is a reference-count bump, so the replayed body shares
//! the captured allocation instead of copying it.
//!
//! Text is decoded as lossy UTF-8: invalid sequences become U+FFFD rather
//! than failing the request.

use axum::body::{Body, Bytes};
use std::fmt;

/// Errors raised while buffering a body.
#[derive(Debug)]
pub enum BodyCaptureError {
    /// The declared `Content-Length` exceeds the capture limit.
    TooLarge {
        /// Length declared by the sender
        declared: u64,
        /// Configured maximum
        limit: usize,
    },

    /// The body stream failed or ran past the limit while being read.
    Read {
        /// Human-readable error message
        message: String,
    },
}

impl fmt::Display for BodyCaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLarge { declared, limit } => {
                write!(f, "body of {declared} bytes exceeds the {limit} byte limit")
            }
            Self::Read { message } => write!(f, "failed to read body: {message}"),
        }
    }
}

impl std::error::Error for BodyCaptureError {}

/// A fully buffered body that can be read as text and replayed any number of
/// times.
#[derive(Debug, Clone, Default)]
pub struct CapturedBody {
    bytes: Bytes,
}

impl CapturedBody {
    /// Buffer `body` to completion, failing if it grows past `limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BodyCaptureError::Read`] if the stream errors or exceeds
    /// `limit`.
    pub async fn read(body: Body, limit: usize) -> Result<Self, BodyCaptureError> {
        let bytes = axum::body::to_bytes(body, limit)
            .await
            .map_err(|e| BodyCaptureError::Read {
                message: e.to_string(),
            })?;
        Ok(Self { bytes })
    }

    /// Body text, decoded as lossy UTF-8.
    ///
    /// Reading never consumes the buffer, so repeated calls return the same
    /// text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Number of buffered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether nothing was buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A new body yielding the buffered bytes from the start.
    #[must_use]
    pub fn replay(&self) -> Body {
        Body::from(self.bytes.clone())
    }

    /// Consume the capture, yielding the buffered bytes as a body.
    #[must_use]
    pub fn into_body(self) -> Body {
        Body::from(self.bytes)
    }
}

/// Read `body` as text and hand back a body that still yields the original
/// content.
///
/// When `content_length` is absent or zero the body is returned untouched
/// with an empty string: nothing is read. This mirrors how streamed bodies
/// without a declared length pass through without being logged.
///
/// # Errors
///
/// - [`BodyCaptureError::TooLarge`] if the declared length exceeds `limit`;
///   the body is not read.
/// - [`BodyCaptureError::Read`] if the stream fails mid-read; the body is
///   lost and cannot be replayed.
pub async fn capture_body(
    body: Body,
    content_length: Option<u64>,
    limit: usize,
) -> Result<(String, Body), BodyCaptureError> {
    let declared = match content_length {
        None | Some(0) => return Ok((String::new(), body)),
        Some(len) => len,
    };

    if usize::try_from(declared).map_or(true, |len| len > limit) {
        return Err(BodyCaptureError::TooLarge { declared, limit });
    }

    let captured = CapturedBody::read(body, limit).await?;
    Ok((captured.text(), captured.into_body()))
}
