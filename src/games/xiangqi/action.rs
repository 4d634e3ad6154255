//! First-class move types.
//!
//! A [`Move`] is what a client asks for. A [`ValidatedMove`] is what a
//! [`MoveRule`](super::MoveRule) hands back once the request passed every
//! check, and it is the only thing the engine will apply.

use super::types::{Coord, Piece, Side, Square};
use derive_more::Display;
use tracing::instrument;

/// A requested move from one coordinate to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{from} -> {to}")]
pub struct Move {
    /// Source coordinate.
    pub from: Coord,
    /// Destination coordinate.
    pub to: Coord,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    /// Creates a move from raw `(row, col)` pairs.
    pub fn from_coords(from_row: i64, from_col: i64, to_row: i64, to_col: i64) -> Self {
        Self::new(Coord::new(from_row, from_col), Coord::new(to_row, to_col))
    }
}

/// A move that passed validation, with both ends on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display("{from} -> {to}")]
pub struct ValidatedMove {
    from: Square,
    to: Square,
}

impl ValidatedMove {
    /// Wraps two on-board squares. Intended for [`MoveRule`](super::MoveRule)
    /// implementations once their checks have passed.
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Source square.
    pub fn from_square(&self) -> Square {
        self.from
    }

    /// Destination square.
    pub fn to_square(&self) -> Square {
        self.to
    }
}

/// Reason a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, derive_more::Error)]
pub enum MoveError {
    /// A coordinate lies outside the board.
    #[display("Coordinate {_0} is off the board")]
    OutOfBounds(#[error(not(source))] Coord),

    /// There is no piece on the source square.
    #[display("No piece at {_0}")]
    EmptySource(#[error(not(source))] Square),

    /// The source piece belongs to the side not on move.
    #[display("Piece {piece} does not belong to side {turn}")]
    NotYourPiece {
        /// The piece the client tried to move.
        piece: Piece,
        /// The side whose turn it is.
        turn: Side,
    },

    /// The destination holds a piece of the mover's own side.
    #[display("Own piece already at {_0}")]
    OwnPieceAtDestination(#[error(not(source))] Square),
}

/// What happened when a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The piece that moved, `None` only if applied against a stale state.
    pub moved: Option<Piece>,
    /// The piece that was on the destination, if any.
    pub captured: Option<Piece>,
    /// Whether this move captured a king-equivalent and ended the game.
    pub ended_game: bool,
}
