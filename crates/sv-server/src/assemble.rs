//! Response assembly for media streaming.
//!
//! Combines a resolved [`MediaResource`] with the parsed `Range` outcome and
//! picks the status, headers and body:
//!
//! | range outcome                 | status | body            |
//! |-------------------------------|--------|-----------------|
//! | none / unparseable            | 200    | whole file      |
//! | satisfiable `[start, end]`    | 206    | `[start, end]`  |
//! | `start >= size`               | 416    | empty           |
//!
//! Missing files (404) and paths escaping the media root (403) never get
//! here; they fail during resolution.

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use sv_core::{ByteRange, Error, MediaResource, Result};

use crate::body::ChunkedBody;

/// Status, headers and (optionally) a lazily produced body.
///
/// The body is owned by the response and consumed by the transport.
#[derive(Debug)]
pub struct StreamingResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<ChunkedBody>,
}

impl StreamingResponse {
    /// 416 with `Content-Range: bytes */size` and no body.
    pub fn range_not_satisfiable(size: u64) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_RANGE, unsatisfied_range(size));
        Self {
            status: StatusCode::RANGE_NOT_SATISFIABLE,
            headers,
            body: None,
        }
    }

    /// Whether this is a 200/206 that will carry media bytes.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Attach an extra header, e.g. `Content-Disposition` for downloads.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

impl IntoResponse for StreamingResponse {
    fn into_response(self) -> Response {
        let body = match self.body {
            Some(chunks) => Body::from_stream(chunks),
            None => Body::empty(),
        };
        (self.status, self.headers, body).into_response()
    }
}

/// Assemble the response for `resource` given the parser's verdict.
///
/// The file is only opened once the range has been validated, so a 416
/// never touches storage.
pub async fn assemble(
    resource: &MediaResource,
    range: Result<Option<ByteRange>>,
    chunk_size: usize,
) -> Result<StreamingResponse> {
    let size = resource.size_bytes;

    let (status, interval) = match range {
        Ok(Some(r)) => (StatusCode::PARTIAL_CONTENT, Some(r)),
        Ok(None) => (StatusCode::OK, ByteRange::full(size)),
        Err(Error::RangeNotSatisfiable { size }) => {
            return Ok(StreamingResponse::range_not_satisfiable(size));
        }
        Err(e) => return Err(e),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(resource.content_type),
    );
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));

    let content_length = interval.map_or(0, |r| r.len());
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));

    if status == StatusCode::PARTIAL_CONTENT {
        if let Some(r) = interval {
            let value = HeaderValue::from_str(&r.content_range(size))
                .map_err(|e| Error::Internal(format!("Invalid Content-Range: {e}")))?;
            headers.insert(header::CONTENT_RANGE, value);
        }
    }

    let body = match interval {
        Some(r) => Some(
            ChunkedBody::open(&resource.storage_path, r, chunk_size)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        tracing::debug!(
                            path = %resource.storage_path.display(),
                            "Media file vanished before it could be opened"
                        );
                        Error::not_found("media", public_name(resource))
                    }
                    _ => Error::Io { source: e },
                })?,
        ),
        None => None,
    };

    tracing::debug!(
        path = %resource.storage_path.display(),
        status = status.as_u16(),
        size,
        range = ?interval.map(|r| (r.start(), r.end())),
        "Assembled media response"
    );

    Ok(StreamingResponse {
        status,
        headers,
        body,
    })
}

/// File name only, so client-facing errors never reveal where the media
/// root lives.
fn public_name(resource: &MediaResource) -> String {
    resource
        .storage_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn unsatisfied_range(size: u64) -> HeaderValue {
    // Digits, a space, '*' and '/' are always valid header bytes.
    HeaderValue::from_str(&format!("bytes */{size}"))
        .unwrap_or_else(|_| HeaderValue::from_static("bytes */0"))
}
