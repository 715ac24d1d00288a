//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`sv_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError {
    inner: sv_core::Error,
}

impl AppError {
    pub fn new(inner: sv_core::Error) -> Self {
        Self { inner }
    }
}

impl From<sv_core::Error> for AppError {
    fn from(e: sv_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in media handler"
            );
        }

        let code = match &self.inner {
            sv_core::Error::NotFound { .. } => "not_found",
            sv_core::Error::Forbidden(_) => "forbidden",
            sv_core::Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            sv_core::Error::Validation(_) => "validation_error",
            sv_core::Error::Io { .. } => "io_error",
            sv_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        let mut response = (status, axum::Json(body)).into_response();
        if let sv_core::Error::RangeNotSatisfiable { size } = self.inner {
            if let Ok(value) = HeaderValue::from_str(&format!("bytes */{size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, value);
            }
        }
        response
    }
}
