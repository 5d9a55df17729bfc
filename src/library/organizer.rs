//! Moves downloaded files into the library layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};

use super::layout::{dotted_extension, LibraryEntry};
use crate::adapters::IdLookup;
use crate::core::FetchError;

/// Files a downloaded movie under `<root>/<title> (<year>)/`
pub struct Organizer<'a> {
    lookup: &'a dyn IdLookup,
    library_root: &'a Path,
    overwrite: bool,
}

impl<'a> Organizer<'a> {
    pub fn new(lookup: &'a dyn IdLookup, library_root: &'a Path) -> Self {
        Self {
            lookup,
            library_root,
            overwrite: false,
        }
    }

    /// Builder: replace an existing destination file instead of failing
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Look up the IMDb id; any failure means "no tag"
    pub async fn resolve_imdb_id(&self, title: &str, year: Option<&str>) -> Option<String> {
        match self.lookup.lookup(title, year).await {
            Ok(id) => {
                info!(service = self.lookup.name(), imdb_id = %id, "Resolved IMDb id");
                Some(id)
            }
            Err(e) => {
                warn!(service = self.lookup.name(), error = %format!("{:#}", e), "Error fetching IMDb ID, continuing without tag");
                None
            }
        }
    }

    /// Rename and move `source` into the library. Returns the final path.
    pub async fn organize(&self, source: &Path, title: &str, year: Option<&str>) -> Result<PathBuf> {
        let imdb_id = self.resolve_imdb_id(title, year).await;
        let entry = LibraryEntry::new(title, year).with_imdb_id(imdb_id);

        let dir = entry.dir_in(self.library_root);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create library folder: {}", dir.display()))?;

        let extension = dotted_extension(source);
        let dest = entry.path_in(self.library_root, extension.as_deref());

        if !self.overwrite && fs::try_exists(&dest).await.unwrap_or(false) {
            return Err(FetchError::DestinationExists { path: dest }.into());
        }

        move_file(source, &dest).await?;
        info!(path = %dest.display(), "File moved and renamed");
        Ok(dest)
    }
}

/// Move a file, falling back to copy + delete across filesystems
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(error = %e, "Rename failed, copying instead");
            fs::copy(from, to).await.with_context(|| {
                format!("Failed to move {} to {}", from.display(), to.display())
            })?;
            fs::remove_file(from)
                .await
                .with_context(|| format!("Failed to remove {}", from.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct FixedLookup(Option<&'static str>);

    #[async_trait]
    impl IdLookup for FixedLookup {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn lookup(&self, _title: &str, _year: Option<&str>) -> Result<String> {
            self.0
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("Movie not found!"))
        }
    }

    async fn downloaded(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"frames").await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_organize_with_tag() {
        let temp = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        let source = downloaded(temp.path(), "Nosferatu_1922.mp4").await;
        let lookup = FixedLookup(Some("tt0013442"));

        let dest = Organizer::new(&lookup, library.path())
            .organize(&source, "Nosferatu", Some("1922"))
            .await
            .unwrap();

        assert_eq!(
            dest,
            library
                .path()
                .join("Nosferatu (1922)")
                .join("Nosferatu (1922) [imdbid-tt0013442].mp4")
        );
        assert!(dest.exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn test_failed_lookup_omits_tag() {
        let temp = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        let source = downloaded(temp.path(), "movie.avi").await;
        let lookup = FixedLookup(None);

        let dest = Organizer::new(&lookup, library.path())
            .organize(&source, "Nosferatu", Some("1922"))
            .await
            .unwrap();

        let name = dest.file_name().unwrap().to_string_lossy().to_string();
        assert_eq!(name, "Nosferatu (1922).avi");
        assert!(!name.contains("imdbid"));
    }

    #[tokio::test]
    async fn test_existing_folder_is_reused() {
        let temp = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        std::fs::create_dir_all(library.path().join("Metropolis")).unwrap();
        let source = downloaded(temp.path(), "metropolis.mkv").await;
        let lookup = FixedLookup(None);

        let dest = Organizer::new(&lookup, library.path())
            .organize(&source, "Metropolis", None)
            .await
            .unwrap();

        assert_eq!(dest, library.path().join("Metropolis").join("Metropolis.mkv"));
    }

    #[tokio::test]
    async fn test_collision_fails_unless_overwrite() {
        let temp = TempDir::new().unwrap();
        let library = TempDir::new().unwrap();
        let lookup = FixedLookup(None);
        let existing = library.path().join("Nosferatu (1922)").join("Nosferatu (1922).mp4");
        std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
        std::fs::write(&existing, b"old").unwrap();

        let source = downloaded(temp.path(), "new.mp4").await;
        let err = Organizer::new(&lookup, library.path())
            .organize(&source, "Nosferatu", Some("1922"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::DestinationExists { .. })
        ));
        assert!(source.exists(), "artifact must be kept when the move is refused");

        let dest = Organizer::new(&lookup, library.path())
            .with_overwrite(true)
            .organize(&source, "Nosferatu", Some("1922"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"frames");
    }
}
