//! Resolution of logical media paths to files under the media root.
//!
//! A logical path is joined under the configured root and canonicalized; the
//! result must still live under the canonical root. Symlinks pointing out of
//! the root are rejected the same way as `..` segments.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use sv_core::{guess_content_type, Error, MediaResource, Result};

/// Longest single path component common filesystems accept.
const MAX_COMPONENT_LEN: usize = 255;

/// Longest logical path worth handing to the filesystem.
const MAX_PATH_LEN: usize = 4096;

/// Resolves logical paths against a fixed media root.
#[derive(Debug, Clone)]
pub struct MediaResourceResolver {
    root: PathBuf,
}

impl MediaResourceResolver {
    /// Build a resolver for `root`. The root must exist; it is canonicalized
    /// once here so every containment check compares canonical paths.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = std::fs::canonicalize(root).map_err(|e| {
            Error::Internal(format!("Media root {} is unusable: {e}", root.display()))
        })?;
        if !root.is_dir() {
            return Err(Error::Internal(format!(
                "Media root {} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// The canonical media root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical path of a resolved file relative to the root, with `/`
    /// separators. Equivalent spellings of one file share a key.
    pub fn relative_key(&self, storage_path: &Path) -> String {
        let rel = storage_path.strip_prefix(&self.root).unwrap_or(storage_path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Resolve `logical_path` to a regular file under the root.
    ///
    /// Fails with [`Error::Forbidden`] when the path escapes the root and
    /// with [`Error::NotFound`] when it does not name an existing regular
    /// file. Nothing is opened or modified.
    pub async fn resolve(&self, logical_path: &str) -> Result<MediaResource> {
        if !stays_within_root(logical_path) {
            tracing::debug!(path = logical_path, "Rejected media path escaping root");
            return Err(Error::forbidden(format!(
                "media path escapes root: {logical_path}"
            )));
        }

        if !is_nameable(logical_path) {
            tracing::debug!(
                len = logical_path.len(),
                "Rejected media path no filesystem can hold"
            );
            return Err(Error::not_found("media", logical_path.escape_debug()));
        }

        let joined = self.root.join(logical_path);
        let canonical = match tokio::fs::canonicalize(&joined).await {
            Ok(p) => p,
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidInput
                ) =>
            {
                return Err(Error::not_found("media", logical_path));
            }
            Err(e) => return Err(Error::Io { source: e }),
        };

        if !canonical.starts_with(&self.root) {
            tracing::debug!(
                path = logical_path,
                target = %canonical.display(),
                "Rejected media path resolving outside root"
            );
            return Err(Error::forbidden(format!(
                "media path escapes root: {logical_path}"
            )));
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| Error::not_found("media", logical_path))?;
        if !metadata.is_file() {
            return Err(Error::not_found("media", logical_path));
        }

        Ok(MediaResource {
            content_type: guess_content_type(&canonical),
            size_bytes: metadata.len(),
            storage_path: canonical,
        })
    }
}

/// Lexical pre-check: absolute paths, drive prefixes, and `..` segments that
/// climb above the root are rejected before touching the filesystem, so a
/// traversal attempt is reported as forbidden even when its target is absent.
fn stays_within_root(logical_path: &str) -> bool {
    let mut depth: usize = 0;
    for component in Path::new(logical_path).components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Whether `logical_path` could name a file at all: no NUL bytes, and no
/// component or total length the filesystem would refuse outright.
fn is_nameable(logical_path: &str) -> bool {
    !logical_path.contains('\0')
        && logical_path.len() <= MAX_PATH_LEN
        && logical_path
            .split('/')
            .all(|segment| segment.len() <= MAX_COMPONENT_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_root() -> (tempfile::TempDir, MediaResourceResolver) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("media/songs")).unwrap();
        std::fs::write(dir.path().join("media/songs/track.mp3"), vec![7u8; 100]).unwrap();
        std::fs::write(dir.path().join("secret.txt"), b"top secret").unwrap();
        let resolver = MediaResourceResolver::new(dir.path().join("media")).unwrap();
        (dir, resolver)
    }

    #[tokio::test]
    async fn resolves_existing_file() {
        let (_dir, resolver) = media_root();
        let res = resolver.resolve("songs/track.mp3").await.unwrap();
        assert_eq!(res.size_bytes, 100);
        assert_eq!(res.content_type, "audio/mpeg");
        assert!(res.storage_path.starts_with(resolver.root()));
    }

    #[tokio::test]
    async fn inner_parent_segments_are_allowed() {
        let (_dir, resolver) = media_root();
        let res = resolver.resolve("songs/../songs/./track.mp3").await.unwrap();
        assert_eq!(res.size_bytes, 100);
    }

    #[tokio::test]
    async fn relative_key_is_canonical() {
        let (_dir, resolver) = media_root();
        for path in ["songs/track.mp3", "songs/./track.mp3", "./songs/../songs/track.mp3"] {
            let res = resolver.resolve(path).await.unwrap();
            assert_eq!(resolver.relative_key(&res.storage_path), "songs/track.mp3");
        }
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let (_dir, resolver) = media_root();
        let err = resolver.resolve("songs/missing.mp3").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn unnameable_paths_are_not_found() {
        let (_dir, resolver) = media_root();
        let long_name = format!("songs/{}.mp3", "a".repeat(300));
        let long_path = "x/".repeat(3000);
        for path in ["songs/track\0.mp3", long_name.as_str(), long_path.as_str()] {
            let err = resolver.resolve(path).await.unwrap_err();
            assert!(matches!(err, Error::NotFound { .. }), "path {path:?}: {err}");
        }
    }

    #[tokio::test]
    async fn directory_is_not_found() {
        let (_dir, resolver) = media_root();
        let err = resolver.resolve("songs").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn parent_traversal_is_forbidden() {
        let (_dir, resolver) = media_root();
        let err = resolver.resolve("../secret.txt").await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn traversal_to_missing_target_is_still_forbidden() {
        let (_dir, resolver) = media_root();
        let err = resolver.resolve("songs/../../nope").await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[tokio::test]
    async fn absolute_path_is_forbidden() {
        let (dir, resolver) = media_root();
        let abs = dir.path().join("secret.txt");
        let err = resolver.resolve(abs.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_out_of_root_is_forbidden() {
        let (dir, resolver) = media_root();
        std::os::unix::fs::symlink(
            dir.path().join("secret.txt"),
            dir.path().join("media/songs/link.mp3"),
        )
        .unwrap();
        let err = resolver.resolve("songs/link.mp3").await.unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = MediaResourceResolver::new("/nonexistent/songvault-root").unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn lexical_check() {
        assert!(stays_within_root("a/b.mp3"));
        assert!(stays_within_root("a/../b.mp3"));
        assert!(stays_within_root(""));
        assert!(!stays_within_root("../b.mp3"));
        assert!(!stays_within_root("a/../../b.mp3"));
        assert!(!stays_within_root("/etc/passwd"));
    }

    #[test]
    fn nameable_check() {
        assert!(is_nameable("songs/track.mp3"));
        assert!(is_nameable(&"a".repeat(MAX_COMPONENT_LEN)));
        assert!(!is_nameable(&"a".repeat(MAX_COMPONENT_LEN + 1)));
        assert!(!is_nameable("a\0b"));
    }
}
