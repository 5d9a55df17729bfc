//! reelfetch - Internet Archive to Jellyfin movie fetcher
//!
//! Searches the Internet Archive for a movie, downloads the best video
//! file, tags it with its IMDb id from OMDb, and files it using the
//! Jellyfin naming convention.
//!
//! # Pipeline
//!
//! Search → Selector → Downloader → Organizer, strictly in order. The
//! only state carried between stages is the selected candidate and the
//! downloaded file's path.
//!
//! # Modules
//!
//! - `adapters`: Internet Archive and OMDb clients behind traits
//! - `core`: pipeline stages and orchestration
//! - `domain`: candidates and file manifests
//! - `library`: Jellyfin layout and file moves
//! - `password`: the password generator
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Fetch a movie interactively
//! reelfetch fetch "Nosferatu" --year 1922
//!
//! # Non-interactive
//! reelfetch fetch "Nosferatu" --year 1922 --index 0
//!
//! # Generate a password
//! reelfetch password --length 20 --letters --numbers
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;
pub mod password;

// Re-export main types at crate root for convenience
pub use crate::adapters::{ArchiveApi, ArchiveClient, DownloadStream, IdLookup, OmdbClient, SearchQuery};
pub use crate::config::ResolvedConfig;
pub use crate::core::{FetchError, FetchOutcome, FetchRequest, Operator, Orchestrator};
pub use crate::domain::{Candidate, ManifestEntry};
pub use crate::library::{LibraryEntry, Organizer};
