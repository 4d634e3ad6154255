//! Command-line interface for xiangqi_echo.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Echo server with a minimal board game endpoint
#[derive(Parser, Debug)]
#[command(name = "xiangqi_echo")]
#[command(about = "HTTP echo server with a turn-based board game API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full server: /api/echo and the /api/game routes
    Serve(ServerArgs),

    /// Run the echo-only server: every path echoes its request body
    Echo(ServerArgs),
}

/// Listening options shared by both servers.
#[derive(Args, Debug)]
pub struct ServerArgs {
    /// Port to bind to (overrides config file and PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (overrides config file and HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
