//! Axum router construction.
//!
//! Builds the application router with the media, download and health
//! routes plus CORS and request tracing layers.

use axum::http::header;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    // Cross-origin audio players need to read the range headers to seek.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
        ]);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/media/{*path}", get(routes::media::stream_media))
        .route("/download/{slug}", get(routes::download::download_song))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
