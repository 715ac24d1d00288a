//! Media value types shared by the streaming responder.

use std::path::{Path, PathBuf};

/// An inclusive, zero-based byte interval `[start, end]` within a resource.
///
/// Always satisfies `start <= end`; "no range requested" is expressed as
/// `Option::<ByteRange>::None`, never as a sentinel pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: u64,
    end: u64,
}

impl ByteRange {
    /// Build a range, returning `None` when `start > end`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// The range covering a whole resource of `size` bytes, or `None` for an
    /// empty resource.
    pub fn full(size: u64) -> Option<Self> {
        size.checked_sub(1).map(|end| Self { start: 0, end })
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered (`end - start + 1`).
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A `ByteRange` always covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Render as a satisfied `Content-Range` value: `bytes start-end/size`.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

/// Immutable snapshot of a resolved media file.
///
/// `size_bytes` is the length of the file at resolution time. If the file is
/// truncated afterwards, body production stops early instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    pub storage_path: PathBuf,
    pub size_bytes: u64,
    pub content_type: &'static str,
}

impl MediaResource {
    /// File extension of the storage path, lowercased.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.storage_path)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Guess the MIME type from a file's extension.
///
/// Unknown or missing extensions fall back to `application/octet-stream`.
pub fn guess_content_type(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("m4b") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("weba") => "audio/webm",
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
