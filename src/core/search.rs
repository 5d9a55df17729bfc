//! Archive search step.

use anyhow::Result;
use tracing::info;

use crate::adapters::{ArchiveApi, SearchQuery};
use crate::domain::Candidate;

/// Search the archive for movies matching a title and optional year.
///
/// Results keep the order the service returned them in. An empty vector
/// means the service found nothing.
pub async fn search(
    archive: &dyn ArchiveApi,
    title: &str,
    year: Option<&str>,
    rows: u32,
) -> Result<Vec<Candidate>> {
    let query = SearchQuery {
        title: title.to_string(),
        year: year.map(String::from),
        rows,
    };

    info!(title, year, "Searching");
    let mut candidates = archive.search(&query).await?;
    candidates.truncate(rows as usize);
    info!(results = candidates.len(), "Search complete");

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DownloadStream;
    use crate::domain::ManifestEntry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingArchive {
        results: usize,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ArchiveApi for RecordingArchive {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
            self.queries.lock().unwrap().push(query.query_string());
            Ok((0..self.results)
                .map(|i| Candidate::new(format!("item_{}", i), format!("Item {}", i)))
                .collect())
        }

        async fn manifest(&self, _identifier: &str) -> Result<Vec<ManifestEntry>> {
            unreachable!("search never reads manifests")
        }

        async fn open_download(&self, _identifier: &str, _file_name: &str) -> Result<DownloadStream> {
            unreachable!("search never downloads")
        }

        fn details_url(&self, identifier: &str) -> String {
            identifier.to_string()
        }
    }

    #[tokio::test]
    async fn test_results_capped_at_rows_in_service_order() {
        let archive = RecordingArchive {
            results: 8,
            queries: Mutex::new(Vec::new()),
        };

        let candidates = search(&archive, "Metropolis", None, 5).await.unwrap();

        assert_eq!(candidates.len(), 5);
        assert_eq!(candidates[0].identifier, "item_0");
        assert_eq!(candidates[4].identifier, "item_4");
        assert_eq!(
            archive.queries.lock().unwrap().clone(),
            vec!["title:\"Metropolis\" AND mediatype:movies".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let archive = RecordingArchive {
            results: 0,
            queries: Mutex::new(Vec::new()),
        };

        let candidates = search(&archive, "Nosferatu", Some("1922"), 5).await.unwrap();
        assert!(candidates.is_empty());
    }
}
