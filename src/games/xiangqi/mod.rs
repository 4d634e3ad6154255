//! Turn-based board game on a 10x9 grid.
//!
//! Red plays xiangqi pieces from the top rows, black plays western chess
//! pieces from the bottom rows. Legality is structural only; see [`rules`].

mod action;
mod game;
pub mod rules;
mod types;

pub use action::{Move, MoveError, MoveOutcome, ValidatedMove};
pub use game::Game;
pub use rules::{MoveRule, StructuralRule};
pub use types::{
    Board, COLS, Coord, GameState, Piece, PieceKind, PieceParseError, ROWS, Side, Square,
};
