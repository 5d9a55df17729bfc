//! Configuration for reelfetch.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (`--library`, `--temp-dir`)
//! 2. Environment variables (REELFETCH_HOME, REELFETCH_LIBRARY,
//!    REELFETCH_TEMP_DIR, OMDB_API_KEY), including a `.env` file
//! 3. Config file (.reelfetch/config.yaml)
//! 4. Defaults (~/.reelfetch)
//!
//! Config file discovery:
//! - Searches current directory and parents for .reelfetch/config.yaml
//! - Paths in config file are relative to the project root (the parent
//!   of `.reelfetch/`)
//!
//! The configuration is resolved once at startup and passed by reference.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::RetryPolicy;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub archive: Option<ArchiveConfig>,
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub library: Option<LibraryConfig>,
    #[serde(default)]
    pub retry: Option<RetryPolicy>,
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to project root)
    pub home: Option<String>,
    /// Jellyfin movie library root
    pub library: Option<String>,
    /// Where downloads land before being organized
    pub temp_dir: Option<String>,
    /// Saved passwords file
    pub password_store: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    pub base_url: Option<String>,
    pub rows: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OmdbConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Replace an existing file at the destination
    pub overwrite: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Library root; movies land in `<library>/<title> (<year>)/`
    pub library: PathBuf,
    /// Temporary download directory
    pub temp_dir: PathBuf,
    /// Password store (JSON lines)
    pub password_store: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub archive: ArchiveSettings,
    pub omdb: OmdbSettings,
    /// Replace existing library files instead of failing
    pub overwrite: bool,
    pub retry: RetryPolicy,
    pub http: HttpSettings,
}

#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    pub base_url: String,
    /// Search result cap
    pub rows: u32,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            base_url: "https://archive.org".to_string(),
            rows: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OmdbSettings {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for OmdbSettings {
    fn default() -> Self {
        Self {
            base_url: "http://www.omdbapi.com".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Timeout for API requests (not for file transfers)
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 15,
            user_agent: format!("reelfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSettings {
    /// Build a shared HTTP client
    pub fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_seconds))
            .user_agent(&self.user_agent)
            .build()
            .context("Failed to build HTTP client")
    }
}

impl ResolvedConfig {
    /// Load configuration from the environment and the nearest config file
    pub fn load() -> Result<Self> {
        let default_home = dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".reelfetch");
        let config_file = std::env::current_dir()
            .ok()
            .and_then(|dir| find_config_file(&dir));

        resolve(config_file, |key| std::env::var(key).ok(), default_home)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, library: Option<PathBuf>, temp_dir: Option<PathBuf>) -> Self {
        if let Some(library) = library {
            self.library = absolutize(library);
        }
        if let Some(temp_dir) = temp_dir {
            self.temp_dir = absolutize(temp_dir);
        }
        self
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".reelfetch").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Make a path absolute against the working directory
fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

/// Merge config file, environment and defaults
fn resolve<F>(config_file: Option<PathBuf>, env: F, default_home: PathBuf) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    // Base directory is the parent of .reelfetch/ (i.e., grandparent of config.yaml)
    let base_dir = config_file
        .as_ref()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."))
        .to_path_buf();
    let paths = file.as_ref().map(|f| f.paths.clone()).unwrap_or_default();
    let from_file = |value: &Option<String>| value.as_deref().map(|p| resolve_path(&base_dir, p));

    let home = env("REELFETCH_HOME")
        .map(PathBuf::from)
        .or_else(|| from_file(&paths.home))
        .unwrap_or(default_home);

    let library = env("REELFETCH_LIBRARY")
        .map(PathBuf::from)
        .or_else(|| from_file(&paths.library))
        .unwrap_or_else(|| home.join("library"));

    let temp_dir = env("REELFETCH_TEMP_DIR")
        .map(PathBuf::from)
        .or_else(|| from_file(&paths.temp_dir))
        .unwrap_or_else(std::env::temp_dir);

    let password_store = from_file(&paths.password_store)
        .unwrap_or_else(|| home.join("passwords.jsonl"));

    let mut archive = ArchiveSettings::default();
    if let Some(cfg) = file.as_ref().and_then(|f| f.archive.as_ref()) {
        if let Some(url) = &cfg.base_url {
            archive.base_url = url.clone();
        }
        if let Some(rows) = cfg.rows {
            archive.rows = rows;
        }
    }

    let mut omdb = OmdbSettings::default();
    if let Some(cfg) = file.as_ref().and_then(|f| f.omdb.as_ref()) {
        if let Some(url) = &cfg.base_url {
            omdb.base_url = url.clone();
        }
        omdb.api_key = cfg.api_key.clone();
    }
    if let Some(key) = env("OMDB_API_KEY").filter(|k| !k.is_empty()) {
        omdb.api_key = Some(key);
    }

    let mut http = HttpSettings::default();
    if let Some(cfg) = file.as_ref().and_then(|f| f.http.as_ref()) {
        http.timeout_seconds = cfg.timeout_seconds.unwrap_or(http.timeout_seconds);
        http.connect_timeout_seconds = cfg
            .connect_timeout_seconds
            .unwrap_or(http.connect_timeout_seconds);
        if let Some(agent) = &cfg.user_agent {
            http.user_agent = agent.clone();
        }
    }

    let overwrite = file
        .as_ref()
        .and_then(|f| f.library.as_ref())
        .and_then(|l| l.overwrite)
        .unwrap_or(false);

    let retry = file
        .as_ref()
        .and_then(|f| f.retry.clone())
        .unwrap_or_default();

    Ok(ResolvedConfig {
        home: absolutize(home),
        library: absolutize(library),
        temp_dir: absolutize(temp_dir),
        password_store: absolutize(password_store),
        config_file,
        archive,
        omdb,
        overwrite,
        retry,
        http,
    })
}
