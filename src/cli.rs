//! Command-line interface for strictly_reversi.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly Reversi - Othello on one terminal or across two
#[derive(Parser, Debug)]
#[command(name = "strictly_reversi")]
#[command(about = "Reversi with an optional remote move log", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML client config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Move log server URL (overrides config and REVERSI_SERVER_URL)
    #[arg(long)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Two players at one terminal
    Local {
        /// Record the game on the move log server
        #[arg(long)]
        mirror: bool,
    },

    /// Create a remote game and play black
    Host,

    /// Join a remote game and play white
    Join {
        /// Game id shared by the host
        game_id: String,
    },
}
