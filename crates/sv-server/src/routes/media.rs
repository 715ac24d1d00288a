//! Path-based media streaming with HTTP range support.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::IntoResponse;

use sv_core::UsageEvent;

use crate::assemble::assemble;
use crate::context::AppContext;
use crate::error::AppError;
use crate::range::parse_range_header;
use crate::usage::spawn_record;

/// Raw `Range` header, if present and valid UTF-8.
pub(crate) fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

/// GET /media/{*path}
///
/// Streams a file from the media root. Paths escaping the root get 403,
/// missing files 404, and ranges starting past the end 416.
pub async fn stream_media(
    State(ctx): State<AppContext>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let resource = ctx.resolver.resolve(&path).await?;
    let range = parse_range_header(range_header(&headers), resource.size_bytes);
    let response = assemble(&resource, range, ctx.chunk_size()).await?;

    if response.is_success() {
        let key = ctx.resolver.relative_key(&resource.storage_path);
        spawn_record(&ctx.recorder, UsageEvent::stream(key));
    }
    Ok(response)
}
