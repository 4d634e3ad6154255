//! xiangqi_echo - unified CLI
//!
//! Runs either the full server (echo plus game API) or the echo-only server.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, ServerArgs};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use xiangqi_echo::{AppState, BodyLimit, GameSession, ServerConfig, echo_router, router, serve};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => run_game_server(args).await,
        Command::Echo(args) => run_echo_server(args).await,
    }
}

/// Resolves the effective configuration for a server command.
#[instrument]
fn resolve_config(args: ServerArgs) -> Result<ServerConfig> {
    let config = ServerConfig::load(args.config.as_deref())?.with_overrides(args.host, args.port);
    info!(?config, "Effective configuration");
    Ok(config)
}

/// Run the echo and game server
async fn run_game_server(args: ServerArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let session = GameSession::new();
    let app = router(AppState::new(session, &config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Starting chess game server on {}", config.bind_addr());
    serve(listener, app, shutdown_signal()).await
}

/// Run the echo-only server
async fn run_echo_server(args: ServerArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let app = echo_router(BodyLimit(*config.max_body_bytes()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Starting echo server on {}", config.bind_addr());
    serve(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
