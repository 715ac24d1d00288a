//! Route handlers for the HTTP surface.

pub mod download;
pub mod health;
pub mod media;
