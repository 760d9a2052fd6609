//! Command-line interface for connect4_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Connect four game server with live updates
#[derive(Parser, Debug)]
#[command(name = "connect4_server")]
#[command(about = "Connect four game server with REST API and live updates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP and WebSocket server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides DATABASE_PATH)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Print a stored game's board
    Show {
        /// Game id
        id: i32,

        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// SQLite database file (overrides DATABASE_PATH)
        #[arg(long)]
        db_path: Option<String>,
    },
}
