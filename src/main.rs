//! Strictly Reversi - terminal client
//!
//! Local games at one keyboard, or remote games through a move log server.

#![warn(missing_docs)]

mod cli;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use strictly_reversi::{ClientConfig, GameId, HttpMoveLog, MoveLog};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging()?;

    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();
    if let Some(url) = cli.server_url {
        config = config.with_server_url(url);
    }
    info!(?config, "Starting Strictly Reversi");

    match cli.command {
        Command::Local { mirror: false } => terminal::run_local(None).await,
        Command::Local { mirror: true } => terminal::run_local(Some(connect(&config)?)).await,
        Command::Host => {
            terminal::run_remote(connect(&config)?, config.poll_interval(), None).await
        }
        Command::Join { game_id } => {
            let game_id = GameId::new(game_id.trim());
            terminal::run_remote(connect(&config)?, config.poll_interval(), Some(game_id)).await
        }
    }
}

/// Logs to a file so the board stays readable.
fn init_logging() -> Result<()> {
    let log_file = std::fs::File::create("strictly_reversi.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Builds the HTTP move log client from config.
#[instrument(skip(config))]
fn connect(config: &ClientConfig) -> Result<Arc<dyn MoveLog>> {
    let url = config
        .server_url()
        .as_deref()
        .context("No server URL: pass --server-url or set REVERSI_SERVER_URL")?;
    let log: Arc<dyn MoveLog> = Arc::new(HttpMoveLog::new(url, config.request_timeout())?);
    Ok(log)
}
