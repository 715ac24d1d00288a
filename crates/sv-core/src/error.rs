//! Unified error type for songvault.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for route handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in songvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "media", "song").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The request tried to reach something outside its allowed scope.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested byte range starts at or beyond the end of the resource.
    #[error("Range not satisfiable for resource of {size} bytes")]
    RangeNotSatisfiable {
        /// Total size of the resource, echoed in `Content-Range: bytes */size`.
        size: u64,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Forbidden(_) => 403,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Forbidden`].
    pub fn forbidden(reason: impl fmt::Display) -> Self {
        Error::Forbidden(reason.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
