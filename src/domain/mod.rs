//! Domain types for reelfetch.
//!
//! - Candidate: a search result
//! - ManifestEntry: one file inside an archive item, and the rule that
//!   picks which one to download

pub mod candidate;
pub mod manifest;

pub use candidate::{flatten_field, Candidate};
pub use manifest::{select_target, ManifestEntry, FALLBACK_EXTENSIONS, PREFERRED_EXTENSION};
