//! Application context shared by all route handlers via Axum state.
//!
//! [`AppContext`] holds only immutable, per-process collaborators behind
//! `Arc`s. Nothing request-specific lives here: every request resolves,
//! opens and streams its own file handle.

use std::sync::Arc;

use sv_core::config::Config;
use sv_core::{MediaResourceLookup, UsageRecorder};

use crate::catalog::Catalog;
use crate::resolver::MediaResourceResolver;
use crate::usage::UsageCounters;

/// Central state handed to every handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Resolver for the configured media root.
    pub resolver: Arc<MediaResourceResolver>,
    /// Catalog lookup used by the download route.
    pub lookup: Arc<dyn MediaResourceLookup>,
    /// Fire-and-forget usage sink.
    pub recorder: Arc<dyn UsageRecorder>,
}

impl AppContext {
    /// Build the default context: resolver over `config.media.root`, an
    /// in-memory catalog from `config.catalog`, and in-memory usage counters.
    ///
    /// The counters are returned too so callers can read them back.
    pub fn from_config(config: Config) -> sv_core::Result<(Self, Arc<UsageCounters>)> {
        let resolver = Arc::new(MediaResourceResolver::new(&config.media.root)?);
        let catalog = Catalog::new(config.catalog.iter().cloned(), resolver.clone());
        tracing::info!(
            root = %resolver.root().display(),
            songs = catalog.len(),
            "Media catalog ready"
        );

        let counters = Arc::new(UsageCounters::new());
        let ctx = Self {
            config: Arc::new(config),
            resolver,
            lookup: Arc::new(catalog),
            recorder: counters.clone(),
        };
        Ok((ctx, counters))
    }

    /// Chunk size for streamed bodies.
    pub fn chunk_size(&self) -> usize {
        self.config.media.effective_chunk_size()
    }
}
