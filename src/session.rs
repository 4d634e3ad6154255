//! Shared handle to the single game of the process.

use crate::games::xiangqi::{Game, GameState, Move, MoveError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Cloneable handle to the one game this server hosts.
///
/// Every operation takes the lock once and holds it for its whole
/// read or validate-then-apply sequence, so concurrent requests are
/// serialized. The game is created lazily on first access.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    game: Arc<Mutex<Option<Game>>>,
}

impl GameSession {
    /// Creates a session with no game yet.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating game session");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Game>> {
        // The engine never panics half way through a mutation, so a
        // poisoned lock still guards a consistent game.
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the current state, initializing on first use.
    #[instrument(skip(self))]
    pub fn state(&self) -> GameState {
        let mut guard = self.lock();
        let game = guard.get_or_insert_with(|| {
            info!("First access, initializing game");
            Game::new()
        });
        game.state().clone()
    }

    /// Validates and applies a move atomically.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason; the state is left untouched.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn make_move(&self, mv: Move) -> Result<GameState, MoveError> {
        let mut guard = self.lock();
        let game = guard.get_or_insert_with(Game::new);

        let validated = game.check_move(&mv).map_err(|e| {
            warn!(error = %e, "Rejected move");
            e
        })?;
        let outcome = game.apply_move(validated);

        info!(
            moved = ?outcome.moved,
            captured = ?outcome.captured,
            game_over = game.state().game_over(),
            next_turn = %game.state().current_turn(),
            "Move completed successfully"
        );
        Ok(game.state().clone())
    }

    /// Replaces the game with a freshly initialized one.
    #[instrument(skip(self))]
    pub fn reset(&self) -> GameState {
        let mut guard = self.lock();
        let game = guard.insert(Game::new());
        debug!("Game reset");
        game.state().clone()
    }
}
