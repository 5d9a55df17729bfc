//! Item file manifests and download target selection.

use serde::{Deserialize, Serialize};

/// Preferred container extension
pub const PREFERRED_EXTENSION: &str = ".mp4";

/// Accepted when no preferred file exists, in no particular order
pub const FALLBACK_EXTENSIONS: &[&str] = &[".mkv", ".avi"];

/// One file reference inside an item's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name (may contain a directory part inside the item)
    pub name: String,

    /// Archive-reported format label, e.g. "h.264"
    #[serde(default)]
    pub format: Option<String>,

    /// Size in bytes as reported by the archive (a string on the wire)
    #[serde(default)]
    pub size: Option<String>,
}

impl ManifestEntry {
    /// Create an entry from just a file name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: None,
            size: None,
        }
    }

    /// Extension including the leading dot, if any
    pub fn extension(&self) -> Option<&str> {
        let file = self.local_file_name();
        file.rfind('.').filter(|&i| i > 0).map(|i| &file[i..])
    }

    /// Last path component of the name, used as the local file name
    pub fn local_file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    fn is_preferred(&self) -> bool {
        self.name.ends_with(PREFERRED_EXTENSION)
    }

    fn is_fallback(&self) -> bool {
        FALLBACK_EXTENSIONS.iter().any(|ext| self.name.ends_with(ext))
    }
}

/// Pick the file to download from a manifest.
///
/// The first `.mp4` in manifest order wins; without one, the first `.mkv`
/// or `.avi`. Returns `None` when nothing is playable.
pub fn select_target(entries: &[ManifestEntry]) -> Option<&ManifestEntry> {
    entries
        .iter()
        .find(|e| e.is_preferred())
        .or_else(|| entries.iter().find(|e| e.is_fallback()))
}
