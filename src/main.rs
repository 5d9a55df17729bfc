//! reelfetch CLI entrypoint

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelfetch::cli::Cli;
use reelfetch::FetchError;

#[tokio::main]
async fn main() -> ExitCode {
    // OMDB_API_KEY and friends may live in a .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing (stderr keeps prompts and results on stdout clean)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse and execute CLI
    let cli = Cli::parse();
    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(FetchError::NoResults { .. }) = e.downcast_ref::<FetchError>() {
                println!("Movie not found.");
            } else {
                eprintln!("ERROR: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
