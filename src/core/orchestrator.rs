//! Fetch pipeline orchestrator.
//!
//! Runs Search → Selector → Downloader → Organizer in order. Each stage
//! completes before the next starts; the only state carried between them
//! is the selected candidate and the downloaded file's path.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use super::downloader::Downloader;
use super::error::FetchError;
use super::search::search;
use super::selector::{select, Operator};
use crate::adapters::{ArchiveApi, IdLookup};
use crate::config::ResolvedConfig;
use crate::domain::Candidate;
use crate::library::Organizer;

/// What to look for
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub title: String,
    pub year: Option<String>,
}

impl FetchRequest {
    pub fn new(title: impl Into<String>, year: Option<String>) -> Self {
        Self {
            title: title.into(),
            year: year.filter(|y| !y.trim().is_empty()),
        }
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// The candidate that was downloaded
    pub candidate: Candidate,
    /// Title the file was filed under
    pub title: String,
    /// Year the file was filed under
    pub year: Option<String>,
    /// Final location in the library
    pub path: PathBuf,
}

/// Wires the pipeline stages to their services
pub struct Orchestrator<'a> {
    config: &'a ResolvedConfig,
    archive: &'a dyn ArchiveApi,
    lookup: &'a dyn IdLookup,
    show_progress: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a ResolvedConfig, archive: &'a dyn ArchiveApi, lookup: &'a dyn IdLookup) -> Self {
        Self {
            config,
            archive,
            lookup,
            show_progress: true,
        }
    }

    /// Builder: enable or disable the download progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run the whole pipeline once
    pub async fn run(&self, request: &FetchRequest, operator: &mut dyn Operator) -> Result<FetchOutcome> {
        let candidates = search(
            self.archive,
            &request.title,
            request.year.as_deref(),
            self.config.archive.rows,
        )
        .await?;
        if candidates.is_empty() {
            return Err(FetchError::NoResults {
                title: request.title.clone(),
            }
            .into());
        }

        let selection = select(operator, self.archive, &candidates)?;

        let downloaded = Downloader::new(self.archive)
            .with_progress(self.show_progress)
            .download(&selection.candidate.identifier, &self.config.temp_dir)
            .await?;

        // The candidate's own year wins; the searched year fills the gap
        let year = selection
            .candidate
            .year
            .clone()
            .or_else(|| request.year.clone());

        let path = Organizer::new(self.lookup, &self.config.library)
            .with_overwrite(self.config.overwrite)
            .organize(&downloaded, &selection.title, year.as_deref())
            .await?;

        info!(path = %path.display(), "Process complete. File ready for Jellyfin");

        Ok(FetchOutcome {
            candidate: selection.candidate,
            title: selection.title,
            year,
            path,
        })
    }
}
