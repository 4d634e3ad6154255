//! Move legality rules.
//!
//! Legality is decided by a [`MoveRule`]. The engine only ever asks the rule
//! and applies what it returns, so piece-specific movement can be added by
//! swapping the rule without touching move application.
//!
//! The shipped [`StructuralRule`] checks, in order:
//! 1. both coordinates are on the board,
//! 2. the source square holds a piece,
//! 3. that piece belongs to the side on move,
//! 4. the destination does not hold a piece of the same side.
//!
//! It does not look at how a piece moves.

use super::action::{Move, MoveError, ValidatedMove};
use super::types::{GameState, Square};
use tracing::{debug, instrument};

/// Decides whether a move is legal in a given state.
pub trait MoveRule {
    /// Validates `mv` against `state`.
    ///
    /// # Errors
    ///
    /// Returns the first check the move fails.
    fn check(&self, state: &GameState, mv: &Move) -> Result<ValidatedMove, MoveError>;
}

/// Precondition: both ends of the move lie on the board.
pub struct InBounds;

impl InBounds {
    /// Resolves the move's coordinates to on-board squares.
    #[instrument]
    pub fn check(mv: &Move) -> Result<(Square, Square), MoveError> {
        let from = mv.from.to_square().ok_or(MoveError::OutOfBounds(mv.from))?;
        let to = mv.to.to_square().ok_or(MoveError::OutOfBounds(mv.to))?;
        Ok((from, to))
    }
}

/// Precondition: the source square holds a piece owned by the side on move.
pub struct MoversPiece;

impl MoversPiece {
    /// Fails unless `from` holds a piece of the side on move.
    #[instrument(skip(state))]
    pub fn check(state: &GameState, from: Square) -> Result<(), MoveError> {
        let piece = state
            .board()
            .get(from)
            .ok_or(MoveError::EmptySource(from))?;
        if piece.side != state.current_turn() {
            return Err(MoveError::NotYourPiece {
                piece,
                turn: state.current_turn(),
            });
        }
        Ok(())
    }
}

/// Precondition: the destination is empty or holds an opposing piece.
pub struct DestinationNotOwn;

impl DestinationNotOwn {
    /// Fails if `to` holds a piece of the side on move.
    #[instrument(skip(state))]
    pub fn check(state: &GameState, to: Square) -> Result<(), MoveError> {
        match state.board().get(to) {
            Some(target) if target.side == state.current_turn() => {
                Err(MoveError::OwnPieceAtDestination(to))
            }
            _ => Ok(()),
        }
    }
}

/// Structural legality only: bounds, presence, ownership, own-piece blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralRule;

impl MoveRule for StructuralRule {
    #[instrument(skip(self, state), fields(turn = %state.current_turn()))]
    fn check(&self, state: &GameState, mv: &Move) -> Result<ValidatedMove, MoveError> {
        let (from, to) = InBounds::check(mv)?;
        MoversPiece::check(state, from)?;
        DestinationNotOwn::check(state, to)?;
        debug!(%mv, "Move passed structural checks");
        Ok(ValidatedMove::new(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::xiangqi::{Board, Coord, Piece, PieceKind, Side};

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_out_of_bounds_reported_before_anything_else() {
        let state = GameState::with_board(Board::empty(), Side::Red);
        let mv = Move::from_coords(0, 0, 10, 0);
        assert_eq!(
            StructuralRule.check(&state, &mv),
            Err(MoveError::OutOfBounds(Coord::new(10, 0)))
        );
    }

    #[test]
    fn test_empty_source() {
        let state = GameState::new();
        let mv = Move::from_coords(5, 5, 6, 5);
        assert_eq!(
            StructuralRule.check(&state, &mv),
            Err(MoveError::EmptySource(sq(5, 5)))
        );
    }

    #[test]
    fn test_wrong_side() {
        let state = GameState::new();
        let mv = Move::from_coords(8, 0, 7, 0);
        assert!(matches!(
            StructuralRule.check(&state, &mv),
            Err(MoveError::NotYourPiece { turn: Side::Red, .. })
        ));
    }

    #[test]
    fn test_own_piece_blocks() {
        let state = GameState::new();
        let mv = Move::from_coords(0, 0, 0, 1);
        assert_eq!(
            StructuralRule.check(&state, &mv),
            Err(MoveError::OwnPieceAtDestination(sq(0, 1)))
        );
    }

    #[test]
    fn test_no_shape_rules() {
        // A soldier jumping across the whole board is structurally fine.
        let mut board = Board::empty();
        board.set(sq(3, 0), Some(Piece::new(Side::Red, PieceKind::Soldier)));
        board.set(sq(9, 8), Some(Piece::new(Side::Black, PieceKind::Rook)));
        let state = GameState::with_board(board, Side::Red);

        let validated = StructuralRule
            .check(&state, &Move::from_coords(3, 0, 9, 8))
            .unwrap();
        assert_eq!(validated.from_square(), sq(3, 0));
        assert_eq!(validated.to_square(), sq(9, 8));
    }
}
