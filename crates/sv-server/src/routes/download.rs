//! Catalog downloads.
//!
//! Serves a song's audio file as an attachment named after the song. Range
//! requests are honoured so interrupted downloads can resume.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;

use sv_core::{Error, UsageEvent};

use crate::assemble::assemble;
use crate::context::AppContext;
use crate::error::AppError;
use crate::range::parse_range_header;
use crate::routes::media::range_header;
use crate::usage::spawn_record;

/// GET /download/{slug}
pub async fn download_song(
    State(ctx): State<AppContext>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let media = ctx.lookup.lookup(&slug).await?;
    let resource = &media.resource;

    let range = parse_range_header(range_header(&headers), resource.size_bytes);
    let mut response = assemble(resource, range, ctx.chunk_size()).await?;

    if response.is_success() {
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            media.download_name
        ))
        .map_err(|e| Error::Internal(format!("Invalid download name: {e}")))?;
        response = response.with_header(header::CONTENT_DISPOSITION, disposition);

        spawn_record(&ctx.recorder, UsageEvent::download(slug));
    }
    Ok(response)
}
