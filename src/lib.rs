//! xiangqi_echo - HTTP echo server with a minimal board game API
//!
//! # Architecture
//!
//! - **Server**: axum routes for the echo endpoint and the game API
//! - **Session**: the one shared game, serialized behind a mutex
//! - **Games**: the board game engine with a replaceable move rule
//! - **Config**: layered server configuration (defaults, TOML, env)
//!
//! # Example
//!
//! ```no_run
//! use xiangqi_echo::{AppState, GameSession, ServerConfig, router, serve};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::default();
//! let app = router(AppState::new(GameSession::new(), &config));
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! serve(listener, app, std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod games;
mod server;
mod session;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Errors
pub use error::{ApiError, BODY_READ_FAILED, INVALID_MOVE};

// Crate-level exports - Server types
pub use server::{
    AppState, BodyLimit, GameStateRecord, MoveRequest, echo_router, router, serve,
};

// Crate-level exports - Session management
pub use session::GameSession;

// Crate-level exports - Game types
pub use games::xiangqi::{
    Board, COLS, Coord, Game, GameState, Move, MoveError, MoveOutcome, MoveRule, Piece,
    PieceKind, PieceParseError, ROWS, Side, Square, StructuralRule, ValidatedMove,
};
