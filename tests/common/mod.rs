//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};

use reelfetch::config::{ArchiveSettings, HttpSettings, OmdbSettings, ResolvedConfig};
use reelfetch::core::RetryPolicy;
use reelfetch::{ArchiveApi, Candidate, DownloadStream, IdLookup, ManifestEntry, SearchQuery};

/// In-memory archive that records every call
pub struct FakeArchive {
    pub candidates: Vec<Candidate>,
    pub manifest: Vec<ManifestEntry>,
    pub chunks: Vec<&'static [u8]>,
    /// Fail the body stream after this many chunks
    pub fail_after: Option<usize>,
    pub send_length: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeArchive {
    pub fn new(candidates: Vec<Candidate>, manifest: &[&str]) -> Self {
        Self {
            candidates,
            manifest: manifest.iter().map(|n| ManifestEntry::new(*n)).collect(),
            chunks: vec![&b"frame-1;"[..], &b"frame-2;"[..], &b"frame-3;"[..]],
            fail_after: None,
            send_length: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ArchiveApi for FakeArchive {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>> {
        self.record(format!("search:{}", query.query_string()));
        Ok(self.candidates.clone())
    }

    async fn manifest(&self, identifier: &str) -> Result<Vec<ManifestEntry>> {
        self.record(format!("manifest:{}", identifier));
        Ok(self.manifest.clone())
    }

    async fn open_download(&self, identifier: &str, file_name: &str) -> Result<DownloadStream> {
        self.record(format!("download:{}/{}", identifier, file_name));

        let total: u64 = self.chunks.iter().map(|c| c.len() as u64).sum();
        let fail_after = self.fail_after;
        let items: Vec<Result<Bytes>> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| match fail_after {
                Some(n) if i >= n => Err(anyhow::anyhow!("connection reset")),
                _ => Ok(Bytes::from_static(*chunk)),
            })
            .collect();

        Ok(DownloadStream {
            content_length: self.send_length.then_some(total),
            body: stream::iter(items).boxed(),
        })
    }

    fn details_url(&self, identifier: &str) -> String {
        format!("https://archive.test/details/{}", identifier)
    }
}

/// Lookup that either always answers or always fails
pub struct FakeLookup {
    pub imdb_id: Option<&'static str>,
    pub calls: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeLookup {
    pub fn found(imdb_id: &'static str) -> Self {
        Self {
            imdb_id: Some(imdb_id),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            imdb_id: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl IdLookup for FakeLookup {
    fn name(&self) -> &str {
        "fake"
    }

    async fn lookup(&self, title: &str, year: Option<&str>) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((title.to_string(), year.map(String::from)));
        self.imdb_id
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("OMDb error: Movie not found!"))
    }
}

/// Configuration rooted in a temp directory
pub fn test_config(root: &Path) -> ResolvedConfig {
    ResolvedConfig {
        home: root.join("home"),
        library: root.join("library"),
        temp_dir: root.join("tmp"),
        password_store: root.join("home").join("passwords.jsonl"),
        config_file: None,
        archive: ArchiveSettings::default(),
        omdb: OmdbSettings::default(),
        overwrite: false,
        retry: RetryPolicy::none(),
        http: HttpSettings::default(),
    }
}

pub fn nosferatu() -> Candidate {
    Candidate::new("nosferatu_1922", "Nosferatu")
        .with_year("1922")
        .with_creator("F. W. Murnau")
}

/// Files directly inside `dir`
pub fn files_in(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}
