//! Internet Archive adapter.
//!
//! Endpoints:
//! - `GET /advancedsearch.php` for search
//! - `GET /metadata/<identifier>` for the file manifest
//! - `GET /download/<identifier>/<file>` for the file itself

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ArchiveApi, DownloadStream, SearchQuery};
use crate::config::ResolvedConfig;
use crate::core::{FetchError, RetryPolicy};
use crate::domain::{flatten_field, Candidate, ManifestEntry};

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str = "identifier,title,creator,year";

/// Internet Archive HTTP client
pub struct ArchiveClient {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
    request_timeout: Duration,
}

/// Advanced search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: Option<SearchDocs>,
}

#[derive(Debug, Deserialize)]
struct SearchDocs {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    identifier: String,
    #[serde(default)]
    title: Value,
    #[serde(default)]
    creator: Value,
    #[serde(default)]
    year: Value,
}

/// Item metadata response (only the manifest is used)
#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    files: Vec<ManifestEntry>,
}

impl ArchiveClient {
    /// Create a client against a base URL such as `https://archive.org`
    pub fn new(base_url: impl Into<String>, client: Client, retry: RetryPolicy) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            retry,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let client = config.http.build_client()?;
        Ok(Self {
            request_timeout: Duration::from_secs(config.http.timeout_seconds),
            ..Self::new(&config.archive.base_url, client, config.retry.clone())
        })
    }

    fn search_url(&self) -> String {
        format!("{}/advancedsearch.php", self.base_url)
    }

    fn metadata_url(&self, identifier: &str) -> String {
        format!("{}/metadata/{}", self.base_url, urlencoding::encode(identifier))
    }

    fn download_url(&self, identifier: &str, file_name: &str) -> String {
        let path = file_name
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/download/{}/{}",
            self.base_url,
            urlencoding::encode(identifier),
            path
        )
    }
}

/// Fail with `HttpStatus` on any non-2xx response
fn ensure_success(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    Ok(response)
}

/// Convert raw search docs into candidates, keeping service order
fn candidates_from(response: SearchResponse) -> Vec<Candidate> {
    response
        .response
        .map(|r| r.docs)
        .unwrap_or_default()
        .into_iter()
        .map(|doc| Candidate {
            title: flatten_field(&doc.title).unwrap_or_else(|| doc.identifier.clone()),
            year: flatten_field(&doc.year),
            creator: flatten_field(&doc.creator),
            identifier: doc.identifier,
        })
        .collect()
}

#[async_trait]
impl ArchiveApi for ArchiveClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        let url = self.search_url();
        let q = query.query_string();
        let rows = query.rows.to_string();
        debug!(query = %q, rows = query.rows, "Searching archive");

        let (url, q, rows) = (url.as_str(), q.as_str(), rows.as_str());
        let parsed: SearchResponse = self
            .retry
            .run("search", move || async move {
                let response = self
                    .client
                    .get(url)
                    .query(&[
                        ("q", q),
                        ("fl[]", SEARCH_FIELDS),
                        ("rows", rows),
                        ("output", "json"),
                    ])
                    .timeout(self.request_timeout)
                    .send()
                    .await
                    .context("Failed to query archive search")?;
                ensure_success(response, url)?
                    .json::<SearchResponse>()
                    .await
                    .context("Failed to parse archive search response")
            })
            .await?;

        Ok(candidates_from(parsed))
    }

    async fn manifest(&self, identifier: &str) -> Result<Vec<ManifestEntry>> {
        let url = self.metadata_url(identifier);
        let url = url.as_str();

        let parsed: MetadataResponse = self
            .retry
            .run("metadata", move || async move {
                let response = self
                    .client
                    .get(url)
                    .timeout(self.request_timeout)
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch metadata for {}", identifier))?;
                ensure_success(response, url)?
                    .json::<MetadataResponse>()
                    .await
                    .with_context(|| format!("Failed to parse metadata for {}", identifier))
            })
            .await?;

        debug!(identifier, files = parsed.files.len(), "Fetched manifest");
        Ok(parsed.files)
    }

    async fn open_download(&self, identifier: &str, file_name: &str) -> Result<DownloadStream> {
        let url = self.download_url(identifier, file_name);
        let url = url.as_str();

        // No request timeout: only the client's connect timeout applies to
        // the body stream.
        let response = self
            .retry
            .run("download", move || async move {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("Failed to start download of {}", url))?;
                ensure_success(response, url)
            })
            .await?;

        Ok(DownloadStream {
            content_length: response.content_length(),
            body: response
                .bytes_stream()
                .map(|chunk| chunk.context("Download interrupted"))
                .boxed(),
        })
    }

    fn details_url(&self, identifier: &str) -> String {
        format!("{}/details/{}", self.base_url, urlencoding::encode(identifier))
    }
}
