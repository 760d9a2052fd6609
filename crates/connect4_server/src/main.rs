//! connect4_server - CLI entry point.

#![warn(missing_docs)]

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use connect4_server::{GameRepository, GameService, GameStore, RoomRegistry, ServerConfig, router};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let config = ServerConfig::load(config.as_deref())?.with_overrides(host, port, db_path);
            init_tracing(&config);
            run_server(config).await
        }
        Command::Show {
            id,
            config,
            db_path,
        } => {
            let config = ServerConfig::load(config.as_deref())?.with_overrides(None, None, db_path);
            init_tracing(&config);
            show_game(&config, id)
        }
    }
}

fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();
}

/// Run the HTTP and WebSocket server
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let repo = GameRepository::new(config.database_path().clone())?;
    repo.migrate()?;

    let service = GameService::new(Arc::new(repo), RoomRegistry::default());
    let app = router(service, config.cors_layer()?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!(addr = %config.bind_addr(), db = %config.database_path(), "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Print a stored game's board
#[instrument(skip(config))]
fn show_game(config: &ServerConfig, id: i32) -> Result<()> {
    let path = config.database_path();
    if !Path::new(path).exists() {
        anyhow::bail!("Database '{}' does not exist", path);
    }
    let repo = GameRepository::new(path.clone())?;
    let state = repo
        .load(id)?
        .with_context(|| format!("Game {} not found", id))?;

    println!("Game {}", id);
    println!("{}", state.board().display());
    println!();
    match state.status() {
        connect4::GameStatus::InProgress => println!("{} to move", state.current_player()),
        connect4::GameStatus::Won(player) => println!("{} won", player),
        connect4::GameStatus::Drawn => println!("Draw"),
    }
    println!("{} moves", state.history().len());
    Ok(())
}
