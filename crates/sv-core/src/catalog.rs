//! Interfaces to the catalog and usage accounting.
//!
//! The streaming responder never touches catalog storage directly. It asks a
//! [`MediaResourceLookup`] to turn a logical identifier into a
//! [`MediaResource`], and notifies a [`UsageRecorder`] after a 200/206
//! response has been assembled.

use async_trait::async_trait;

use crate::error::Result;
use crate::media::MediaResource;

/// A catalog entry resolved to a streamable resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMedia {
    pub resource: MediaResource,
    /// File name offered to clients in `Content-Disposition`.
    pub download_name: String,
}

/// Maps a logical identifier (e.g. a song slug) to a storage location, size
/// and content type.
#[async_trait]
pub trait MediaResourceLookup: Send + Sync {
    /// Look up `id`. Unknown identifiers yield [`crate::Error::NotFound`].
    async fn lookup(&self, id: &str) -> Result<CatalogMedia>;
}

/// What kind of access a [`UsageEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageKind {
    /// Media served through the path-based media route.
    Stream,
    /// Catalog entry served as an attachment.
    Download,
}

/// A successful media response, reported after assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEvent {
    pub key: String,
    pub kind: UsageKind,
}

impl UsageEvent {
    pub fn stream(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: UsageKind::Stream,
        }
    }

    pub fn download(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: UsageKind::Download,
        }
    }
}

/// Receives usage events. Callers fire and forget; implementations must not
/// assume anyone awaits them.
#[async_trait]
pub trait UsageRecorder: Send + Sync {
    async fn record(&self, event: UsageEvent);
}
