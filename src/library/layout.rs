//! Jellyfin naming convention for movie folders and files.
//!
//! ```text
//! <root>/<title> (<year>)/<title> (<year>) [imdbid-<id>].<ext>
//! ```

use std::path::{Path, PathBuf};

/// Name components of a library entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Display title (already sanitized for use in a path)
    pub title: String,

    /// Release year
    pub year: Option<String>,

    /// IMDb identifier, e.g. "tt0013442"
    pub imdb_id: Option<String>,
}

impl LibraryEntry {
    /// Create an entry, sanitizing the title
    pub fn new(title: &str, year: Option<&str>) -> Self {
        Self {
            title: sanitize_title(title),
            year: year.map(str::trim).filter(|y| !y.is_empty()).map(String::from),
            imdb_id: None,
        }
    }

    /// Builder: attach an IMDb identifier
    pub fn with_imdb_id(mut self, imdb_id: Option<String>) -> Self {
        self.imdb_id = imdb_id.filter(|id| !id.trim().is_empty());
        self
    }

    /// `<title> (<year>)`, or just `<title>` without a year
    pub fn folder_name(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }

    /// ` [imdbid-<id>]`, or empty when no id was resolved
    pub fn tag(&self) -> String {
        self.imdb_id
            .as_ref()
            .map(|id| format!(" [imdbid-{}]", id))
            .unwrap_or_default()
    }

    /// File name with the given extension (including the dot)
    pub fn file_name(&self, extension: Option<&str>) -> String {
        format!(
            "{}{}{}",
            self.folder_name(),
            self.tag(),
            extension.unwrap_or_default()
        )
    }

    /// Directory for this entry under the library root
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(self.folder_name())
    }

    /// Full destination path under the library root
    pub fn path_in(&self, root: &Path, extension: Option<&str>) -> PathBuf {
        self.dir_in(root).join(self.file_name(extension))
    }
}

/// Extension of a file path including the leading dot
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Make a title safe to use as a single path component under the library
/// root. Separators become `-`; a title that is empty or only dots
/// (`.`, `..`) becomes dashes, so it can never name the root or its parent.
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    if cleaned.is_empty() {
        return "-".to_string();
    }
    if cleaned.chars().all(|c| c == '.') {
        return "-".repeat(cleaned.len());
    }
    cleaned
}
