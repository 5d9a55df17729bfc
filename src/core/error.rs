//! Domain errors for the fetch pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal pipeline errors that callers may want to match on
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("No results found for \"{title}\"")]
    NoResults { title: String },

    #[error("Invalid selection \"{input}\": expected a number")]
    InvalidSelection { input: String },

    #[error("Selection {index} is out of range (0..{count})")]
    SelectionOutOfRange { index: usize, count: usize },

    #[error("No suitable movie files found in {identifier}")]
    NoSuitableFile { identifier: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },
}

impl FetchError {
    /// Whether the error is worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::HttpStatus { status, .. } if *status >= 500 || *status == 429)
    }
}
