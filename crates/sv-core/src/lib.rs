//! sv-core: shared types, errors, configuration, and collaborator traits.
//!
//! This crate is the foundational dependency for the other sv-* crates. It
//! defines the byte-range and media-resource value types used by the
//! streaming responder, a unified error type, application configuration,
//! and the two narrow interfaces through which the responder talks to the
//! catalog ([`MediaResourceLookup`]) and to usage accounting
//! ([`UsageRecorder`]).

pub mod catalog;
pub mod config;
pub mod error;
pub mod media;

// Re-export the most commonly used items at the crate root.
pub use catalog::{CatalogMedia, MediaResourceLookup, UsageEvent, UsageKind, UsageRecorder};
pub use error::{Error, Result};
pub use media::*;
