//! OMDb adapter for resolving IMDb identifiers.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::IdLookup;
use crate::config::ResolvedConfig;

/// OMDb HTTP client
pub struct OmdbClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
    request_timeout: Duration,
}

/// Response from the OMDb title endpoint
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbResponse {
    /// The IMDb id, or an error carrying OMDb's message
    fn into_imdb_id(self) -> Result<String> {
        if self.response != "True" {
            anyhow::bail!(
                "OMDb error: {}",
                self.error.unwrap_or_else(|| "Unknown error".to_string())
            );
        }
        self.imdb_id
            .filter(|id| !id.is_empty())
            .context("OMDb response has no imdbID")
    }
}

impl OmdbClient {
    /// Create a new OMDb client
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let client = config.http.build_client()?;
        Ok(Self {
            request_timeout: Duration::from_secs(config.http.timeout_seconds),
            ..Self::new(&config.omdb.base_url, config.omdb.api_key.clone(), client)
        })
    }

    /// Query parameters for a title lookup
    fn params<'a>(api_key: &'a str, title: &'a str, year: Option<&'a str>) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("apikey", api_key), ("t", title)];
        if let Some(year) = year {
            params.push(("y", year));
        }
        params
    }
}

#[async_trait]
impl IdLookup for OmdbClient {
    fn name(&self) -> &str {
        "omdb"
    }

    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("No OMDb API key configured (set OMDB_API_KEY)")?;

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&Self::params(api_key, title, year))
            .timeout(self.request_timeout)
            .send()
            .await
            .context("Failed to query OMDb")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("OMDb returned HTTP {}", status);
        }

        response
            .json::<OmdbResponse>()
            .await
            .context("Failed to parse OMDb response")?
            .into_imdb_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let json = r#"{"Title":"Nosferatu","Year":"1922","imdbID":"tt0013442","Response":"True"}"#;
        let parsed: OmdbResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.into_imdb_id().unwrap(), "tt0013442");
    }

    #[test]
    fn test_error_response_carries_message() {
        let json = r#"{"Response":"False","Error":"Movie not found!"}"#;
        let parsed: OmdbResponse = serde_json::from_str(json).unwrap();
        let err = parsed.into_imdb_id().unwrap_err();
        assert!(err.to_string().contains("Movie not found!"));
    }

    #[test]
    fn test_params_with_and_without_year() {
        assert_eq!(
            OmdbClient::params("KEY", "Nosferatu", Some("1922")),
            vec![("apikey", "KEY"), ("t", "Nosferatu"), ("y", "1922")]
        );
        assert_eq!(
            OmdbClient::params("KEY", "Nosferatu", None),
            vec![("apikey", "KEY"), ("t", "Nosferatu")]
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = OmdbClient::new("http://www.omdbapi.com", None, Client::new());
        let err = client.lookup("Nosferatu", Some("1922")).await.unwrap_err();
        assert!(err.to_string().contains("OMDB_API_KEY"));
    }
}
