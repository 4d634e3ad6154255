//! Game engine: owns the state and applies validated moves.

use super::action::{Move, MoveError, MoveOutcome, ValidatedMove};
use super::rules::{MoveRule, StructuralRule};
use super::types::GameState;
use tracing::{debug, info, instrument};

/// Board game engine, generic over the legality rule.
#[derive(Debug, Clone)]
pub struct Game<R = StructuralRule> {
    state: GameState,
    rule: R,
}

impl Game {
    /// Creates a game in the starting position with structural rules.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rule(StructuralRule)
    }

    /// Creates a game from an arbitrary state with structural rules.
    #[instrument]
    pub fn from_state(state: GameState) -> Self {
        Self {
            state,
            rule: StructuralRule,
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: MoveRule> Game<R> {
    /// Creates a game in the starting position using `rule` for legality.
    pub fn with_rule(rule: R) -> Self {
        Self {
            state: GameState::new(),
            rule,
        }
    }

    /// Resets to the starting layout with red to move and no winner.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) {
        self.state = GameState::new();
        info!("Game initialized");
    }

    /// Returns the current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Checks a move against the rule without changing anything.
    ///
    /// # Errors
    ///
    /// Returns the reason the move is illegal.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn check_move(&self, mv: &Move) -> Result<ValidatedMove, MoveError> {
        self.rule.check(&self.state, mv)
    }

    /// Whether the move is legal in the current state.
    pub fn validate_move(&self, mv: &Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Applies a move returned by [`Game::check_move`].
    ///
    /// Capturing the opponent's king-equivalent ends the game with the mover
    /// as winner. The turn passes to the other side unconditionally, also
    /// when the move just ended the game.
    #[instrument(skip(self), fields(mv = %mv, turn = %self.state.current_turn()))]
    pub fn apply_move(&mut self, mv: ValidatedMove) -> MoveOutcome {
        let (from, to) = (mv.from_square(), mv.to_square());
        let moved = self.state.board().get(from);
        let captured = self.state.board().get(to);

        let mover = self.state.current_turn();
        let ended_game = captured
            .is_some_and(|piece| piece.side != mover && piece.kind.is_king_equivalent());

        let board = self.state.board_mut();
        board.set(to, moved);
        board.set(from, None);

        if ended_game {
            self.state.set_winner(mover);
            info!(winner = %mover, "King-equivalent captured, game over");
        }
        self.state.toggle_turn();

        debug!(
            moved = ?moved,
            captured = ?captured,
            next_turn = %self.state.current_turn(),
            "Move applied"
        );

        MoveOutcome {
            moved,
            captured,
            ended_game,
        }
    }
}
