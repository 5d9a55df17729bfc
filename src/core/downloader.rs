//! Manifest lookup, file selection and streamed download.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::error::FetchError;
use crate::adapters::{ArchiveApi, DownloadStream};
use crate::domain::select_target;

/// Downloads the best video file of an archive item
pub struct Downloader<'a> {
    archive: &'a dyn ArchiveApi,
    show_progress: bool,
}

impl<'a> Downloader<'a> {
    pub fn new(archive: &'a dyn ArchiveApi) -> Self {
        Self {
            archive,
            show_progress: true,
        }
    }

    /// Builder: enable or disable the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Download one file of `identifier` into `dest_dir`.
    ///
    /// Returns the local path. A partially written file is removed if the
    /// transfer fails.
    pub async fn download(&self, identifier: &str, dest_dir: &Path) -> Result<PathBuf> {
        let manifest = self.archive.manifest(identifier).await?;
        let entry = select_target(&manifest).ok_or_else(|| FetchError::NoSuitableFile {
            identifier: identifier.to_string(),
        })?;
        info!(identifier, file = %entry.name, "Selected file");

        fs::create_dir_all(dest_dir)
            .await
            .with_context(|| format!("Failed to create download directory: {}", dest_dir.display()))?;
        let local_name = entry.local_file_name();
        let local_path = dest_dir.join(local_name);

        // Never truncate a file already in the temp dir; it may be an
        // artifact kept from an earlier run.
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&local_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create {} (remove it if it is left over from an earlier run)",
                    local_path.display()
                )
            })?;

        info!(dest = %local_path.display(), "Downloading");
        let started = Instant::now();
        match self.transfer(identifier, &entry.name, file, &local_path, local_name).await {
            Ok(bytes) => {
                info!(
                    path = %local_path.display(),
                    bytes,
                    secs = format!("{:.1}", started.elapsed().as_secs_f64()),
                    "Download complete"
                );
                Ok(local_path)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&local_path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %local_path.display(), error = %cleanup, "Failed to remove partial download");
                    }
                }
                Err(e)
            }
        }
    }

    /// Open the transfer and write it into `file`, returning the byte count
    async fn transfer(
        &self,
        identifier: &str,
        file_name: &str,
        file: fs::File,
        path: &Path,
        name: &str,
    ) -> Result<u64> {
        let stream = self.archive.open_download(identifier, file_name).await?;
        self.write_stream(stream, file, path, name).await
    }

    /// Write the body to `file`, returning the byte count
    async fn write_stream(
        &self,
        mut stream: DownloadStream,
        mut file: fs::File,
        path: &Path,
        name: &str,
    ) -> Result<u64> {
        let progress = progress_bar(stream.content_length, name, self.show_progress);

        let mut written: u64 = 0;
        while let Some(chunk) = stream.body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written += chunk.len() as u64;
            progress.inc(chunk.len() as u64);
        }
        file.flush().await?;

        progress.finish_and_clear();
        Ok(written)
    }
}

/// Byte progress bar; a spinner when the total is unknown
fn progress_bar(total: Option<u64>, name: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let bar = match total {
        Some(len) if len > 0 => {
            let bar = ProgressBar::new(len);
            bar.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} @ {bytes_per_sec} ({eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━╌"),
            );
            bar
        }
        _ => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg} {bytes} @ {bytes_per_sec}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        }
    };
    bar.set_message(name.to_string());
    bar
}
