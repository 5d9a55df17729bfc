//! Jellyfin library layout and file organization.
//!
//! Movies are stored as:
//! ```text
//! <library>/
//! └── <title> (<year>)/
//!     └── <title> (<year>) [imdbid-<id>].<ext>
//! ```

pub mod layout;
pub mod organizer;

pub use layout::{dotted_extension, sanitize_title, LibraryEntry};
pub use organizer::{move_file, Organizer};
