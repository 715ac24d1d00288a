//! In-memory song catalog.
//!
//! Seeded from the `catalog` config section. Audio files are resolved through
//! the [`MediaResourceResolver`], so catalog entries are held to the same
//! media-root containment as direct media requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use sv_core::config::SongEntry;
use sv_core::{CatalogMedia, Error, MediaResourceLookup, Result};

use crate::resolver::MediaResourceResolver;

/// Slug-indexed songs backed by files under the media root.
#[derive(Debug)]
pub struct Catalog {
    songs: HashMap<String, SongEntry>,
    resolver: Arc<MediaResourceResolver>,
}

impl Catalog {
    /// Build a catalog from seed entries. Later duplicates of a slug win.
    pub fn new(
        entries: impl IntoIterator<Item = SongEntry>,
        resolver: Arc<MediaResourceResolver>,
    ) -> Self {
        let songs = entries
            .into_iter()
            .map(|song| (song.slug.clone(), song))
            .collect();
        Self { songs, resolver }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[async_trait]
impl MediaResourceLookup for Catalog {
    async fn lookup(&self, id: &str) -> Result<CatalogMedia> {
        let song = self
            .songs
            .get(id)
            .ok_or_else(|| Error::not_found("song", id))?;

        let resource = self.resolver.resolve(&song.audio_file).await?;
        let download_name = download_name(song, resource.extension().as_deref());

        Ok(CatalogMedia {
            resource,
            download_name,
        })
    }
}

/// `"<title> - <artist>.<ext>"`, with characters that would break a quoted
/// `Content-Disposition` filename replaced.
fn download_name(song: &SongEntry, extension: Option<&str>) -> String {
    let stem: String = format!("{} - {}", song.title, song.artist)
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{stem}.{}", extension.unwrap_or("mp3"))
}
