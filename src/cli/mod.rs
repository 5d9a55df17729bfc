//! Command-line interface for reelfetch.
//!
//! Provides commands for fetching a movie into the library, generating
//! passwords, and showing the resolved configuration.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::adapters::{ArchiveClient, OmdbClient};
use crate::config::ResolvedConfig;
use crate::core::{FetchRequest, Orchestrator, ScriptedOperator, TerminalOperator};

pub mod password;

/// reelfetch - Internet Archive to Jellyfin movie fetcher
#[derive(Parser, Debug)]
#[command(name = "reelfetch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the archive, download a movie and file it in the library
    Fetch {
        /// Movie title to search for
        title: String,

        /// Release year filter
        #[arg(short, long)]
        year: Option<String>,

        /// Pick this result index instead of prompting
        #[arg(short, long)]
        index: Option<usize>,

        /// File under this title instead of the archive's (with --index)
        #[arg(long, requires = "index")]
        title_override: Option<String>,

        /// Library root (overrides config and REELFETCH_LIBRARY)
        #[arg(long)]
        library: Option<PathBuf>,

        /// Temporary download directory
        #[arg(long)]
        temp_dir: Option<PathBuf>,

        /// Hide the download progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Generate a random password
    Password(password::PasswordArgs),

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = ResolvedConfig::load()?;

        match self.command {
            Commands::Fetch {
                title,
                year,
                index,
                title_override,
                library,
                temp_dir,
                no_progress,
            } => {
                let config = config.with_overrides(library, temp_dir);
                let request = FetchRequest::new(title, year);
                fetch_movie(&config, &request, index, title_override, !no_progress).await
            }
            Commands::Password(args) => password::execute(args, &config).await,
            Commands::Config => show_config(&config),
        }
    }
}

/// Run the fetch pipeline with a terminal or scripted operator
async fn fetch_movie(
    config: &ResolvedConfig,
    request: &FetchRequest,
    index: Option<usize>,
    title_override: Option<String>,
    show_progress: bool,
) -> Result<()> {
    let archive = ArchiveClient::from_config(config)?;
    let omdb = OmdbClient::from_config(config)?;
    if config.omdb.api_key.is_none() {
        warn!("OMDB_API_KEY is not set; files will be saved without an IMDb tag");
    }

    println!("Searching for: {}", request.title);
    let orchestrator = Orchestrator::new(config, &archive, &omdb).with_progress(show_progress);

    let outcome = match index {
        Some(index) => {
            let mut operator = ScriptedOperator::new(index, title_override).with_echo(true);
            orchestrator.run(request, &mut operator).await?
        }
        None => {
            let stdin = io::stdin();
            let mut operator = TerminalOperator::new(stdin.lock(), io::stdout());
            orchestrator.run(request, &mut operator).await?
        }
    };

    println!("File moved and renamed to: {}", outcome.path.display());
    println!("Process complete. File ready for Jellyfin.");
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("reelfetch configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:           {}", cfg.home.display());
    println!("  Library:        {}", cfg.library.display());
    println!("  Downloads:      {}", cfg.temp_dir.display());
    println!("  Password store: {}", cfg.password_store.display());
    println!();
    println!("Services:");
    println!("  Archive:        {} (rows: {})", cfg.archive.base_url, cfg.archive.rows);
    println!(
        "  OMDb:           {} (api key: {})",
        cfg.omdb.base_url,
        if cfg.omdb.api_key.is_some() { "set" } else { "missing" }
    );
    println!();
    println!("Library:");
    println!("  Overwrite existing: {}", cfg.overwrite);
    println!();
    println!("Retry:");
    println!("  Max attempts:   {}", cfg.retry.max_attempts);
    println!("  Initial delay:  {}ms", cfg.retry.initial_delay_ms);
    println!("  Max delay:      {}ms", cfg.retry.max_delay_ms);
    println!("  Backoff:        x{}", cfg.retry.backoff_multiplier);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_year() {
        let cli = Cli::try_parse_from(["reelfetch", "fetch", "Nosferatu", "--year", "1922"]).unwrap();
        match cli.command {
            Commands::Fetch { title, year, index, .. } => {
                assert_eq!(title, "Nosferatu");
                assert_eq!(year.as_deref(), Some("1922"));
                assert!(index.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_title_override_requires_index() {
        let result = Cli::try_parse_from(["reelfetch", "fetch", "Nosferatu", "--title-override", "X"]);
        assert!(result.is_err());
    }
}
