//! sv-server: the HTTP byte-range media streaming responder.
//!
//! The request path runs through four stages:
//!
//! - [`range`]: parse the `Range` header into a byte interval (or none)
//! - [`resolver`]: turn a logical path into a file under the media root
//! - [`assemble`]: pick status and headers, then open the body
//! - [`body`]: stream exactly the requested bytes in bounded chunks
//!
//! Around them sit the Axum router, the in-memory catalog and usage
//! counters, and graceful shutdown.

pub mod assemble;
pub mod body;
pub mod catalog;
pub mod context;
pub mod error;
pub mod range;
pub mod resolver;
pub mod router;
pub mod routes;
pub mod usage;

use std::net::SocketAddr;

use sv_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the songvault server.
///
/// Builds the [`AppContext`] from `config` and serves HTTP until a shutdown
/// signal arrives or `cancel` is triggered.
pub async fn start(config: Config, cancel: CancellationToken) -> sv_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| sv_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let (ctx, _counters) = AppContext::from_config(config)?;
    let app = router::build_router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| sv_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;
    tracing::info!("Starting server on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
