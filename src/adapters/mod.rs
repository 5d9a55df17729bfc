//! Adapter interfaces for external services.
//!
//! The pipeline only talks to these traits, so tests can swap in
//! in-memory fakes for the Internet Archive and OMDb.

pub mod archive;
pub mod omdb;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

use crate::domain::{Candidate, ManifestEntry};

pub use archive::ArchiveClient;
pub use omdb::OmdbClient;

/// Parameters for an archive search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Title to match
    pub title: String,

    /// Optional release year filter
    pub year: Option<String>,

    /// Maximum number of results
    pub rows: u32,
}

impl SearchQuery {
    /// Boolean-AND query string for the advanced search endpoint
    pub fn query_string(&self) -> String {
        match &self.year {
            Some(year) => format!(
                "title:\"{}\" AND mediatype:movies AND year:{}",
                self.title, year
            ),
            None => format!("title:\"{}\" AND mediatype:movies", self.title),
        }
    }
}

/// An open file transfer
pub struct DownloadStream {
    /// Value of the Content-Length header, if sent
    pub content_length: Option<u64>,

    /// Response body chunks
    pub body: BoxStream<'static, Result<Bytes>>,
}

/// Search, manifest, and file transfer against a media archive
#[async_trait]
pub trait ArchiveApi: Send + Sync {
    /// Search for items, in the order the service returns them
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>>;

    /// Fetch the file manifest of an item
    async fn manifest(&self, identifier: &str) -> Result<Vec<ManifestEntry>>;

    /// Start streaming one file of an item
    async fn open_download(&self, identifier: &str, file_name: &str) -> Result<DownloadStream>;

    /// Human-facing page for an item
    fn details_url(&self, identifier: &str) -> String;
}

/// Resolves an external identifier for a title
#[async_trait]
pub trait IdLookup: Send + Sync {
    /// Human-readable service name
    fn name(&self) -> &str;

    /// Look up an identifier; an error means "no match"
    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_with_year() {
        let query = SearchQuery {
            title: "Nosferatu".into(),
            year: Some("1922".into()),
            rows: 5,
        };
        assert_eq!(
            query.query_string(),
            "title:\"Nosferatu\" AND mediatype:movies AND year:1922"
        );
    }

    #[test]
    fn test_query_string_without_year() {
        let query = SearchQuery {
            title: "Sherlock Holmes".into(),
            year: None,
            rows: 5,
        };
        assert_eq!(
            query.query_string(),
            "title:\"Sherlock Holmes\" AND mediatype:movies"
        );
    }
}
