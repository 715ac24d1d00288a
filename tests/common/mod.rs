//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which lays out a temporary media root with known
//! fixture files, a small catalog, and a full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sv_core::config::{Config, SongEntry};
use sv_server::context::AppContext;
use sv_server::router::build_router;
use sv_server::usage::{UsageCounters, UsageCounts};

/// Size of `songs/track.mp3`.
pub const TRACK_LEN: usize = 100;
/// Size of `songs/long.mp3`.
pub const LONG_LEN: usize = 200_000;

/// Deterministic fixture content: byte `i` is `i % 251`.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Temp media root plus a fully-constructed [`AppContext`].
///
/// Layout:
/// ```text
/// <tmp>/secret.txt            outside the media root
/// <tmp>/media/songs/track.mp3 TRACK_LEN bytes
/// <tmp>/media/songs/long.mp3  LONG_LEN bytes
/// <tmp>/media/songs/empty.mp3 0 bytes
/// ```
pub struct TestHarness {
    pub ctx: AppContext,
    pub counters: Arc<UsageCounters>,
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a harness with the default fixture catalog.
    pub fn new() -> Self {
        Self::with_chunk_size(4096)
    }

    /// Create a harness streaming with the given chunk size.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let media = dir.path().join("media");
        std::fs::create_dir_all(media.join("songs")).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"not for you").unwrap();
        std::fs::write(media.join("songs/track.mp3"), pattern(TRACK_LEN)).unwrap();
        std::fs::write(media.join("songs/long.mp3"), pattern(LONG_LEN)).unwrap();
        std::fs::write(media.join("songs/empty.mp3"), b"").unwrap();

        let mut config = Config::default();
        config.media.root = media;
        config.media.chunk_size = chunk_size;
        config.catalog = vec![
            SongEntry {
                slug: "blue-monday".into(),
                title: "Blue Monday".into(),
                artist: "Ada".into(),
                audio_file: "songs/track.mp3".into(),
            },
            SongEntry {
                slug: "ghost".into(),
                title: "Ghost".into(),
                artist: "Nobody".into(),
                audio_file: "songs/ghost.mp3".into(),
            },
            SongEntry {
                slug: "escape".into(),
                title: "Escape".into(),
                artist: "Nobody".into(),
                audio_file: "../secret.txt".into(),
            },
        ];

        let (ctx, counters) =
            AppContext::from_config(config).expect("failed to build app context");
        Self { ctx, counters, dir }
    }

    /// Router over this harness's context.
    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    /// Path inside the media root.
    pub fn media_path(&self, rel: &str) -> PathBuf {
        self.dir.path().join("media").join(rel)
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::serve(Self::new()).await
    }

    /// Start an Axum server for an existing harness.
    pub async fn serve(harness: Self) -> (Self, SocketAddr) {
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Poll the usage counters until `pred` holds or a second passes.
    pub async fn wait_for_usage(
        &self,
        key: &str,
        pred: impl Fn(UsageCounts) -> bool,
    ) -> UsageCounts {
        for _ in 0..100 {
            let counts = self.counters.get(key);
            if pred(counts) {
                return counts;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.counters.get(key)
    }

    /// Give fire-and-forget recorders a chance to run, then read counters.
    pub async fn settled_usage(&self, key: &str) -> UsageCounts {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.counters.get(key)
    }
}
