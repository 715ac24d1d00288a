//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, media and catalog sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Default chunk size for streamed bodies.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub catalog: Vec<SongEntry>,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.media.chunk_size == 0 {
            warnings.push(format!(
                "media.chunk_size is 0; {DEFAULT_CHUNK_SIZE} will be used"
            ));
        }

        if !self.media.root.is_dir() {
            warnings.push(format!(
                "media.root {} is not an existing directory",
                self.media.root.display()
            ));
        }

        let mut seen = HashSet::new();
        for (i, song) in self.catalog.iter().enumerate() {
            if song.slug.is_empty() {
                warnings.push(format!("catalog[{i}].slug is empty"));
            } else if !seen.insert(song.slug.as_str()) {
                warnings.push(format!("catalog[{i}].slug '{}' is a duplicate", song.slug));
            }
            if song.audio_file.is_empty() {
                warnings.push(format!("catalog[{i}].audio_file is empty"));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Media storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory under which every logical media path is resolved.
    pub root: PathBuf,
    /// Maximum size of each streamed body chunk, in bytes.
    pub chunk_size: usize,
}

impl MediaConfig {
    /// The configured chunk size, with `0` replaced by the default.
    pub fn effective_chunk_size(&self) -> usize {
        if self.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            self.chunk_size
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./media"),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A catalog seed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongEntry {
    pub slug: String,
    pub title: String,
    pub artist: String,
    /// Logical path of the audio file under `media.root`.
    pub audio_file: String,
}
