//! Core domain types for the board game.

use derive_more::Display;
use std::fmt;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Number of rows on the board.
pub const ROWS: usize = 10;

/// Number of columns on the board.
pub const COLS: usize = 9;

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, strum::EnumIter)]
pub enum Side {
    /// Red side (xiangqi pieces, moves first).
    #[display("r")]
    Red,
    /// Black side (western chess pieces).
    #[display("b")]
    Black,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Parses a wire code (`"r"` or `"b"`), the inverse of `Display`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|side| side.to_string() == code)
    }
}

/// The kind of a piece, identified on the wire by its glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    /// 車
    Chariot,
    /// 馬
    Horse,
    /// 象
    Elephant,
    /// 士
    Advisor,
    /// 帥, red's king-equivalent.
    General,
    /// 炮
    Cannon,
    /// 兵
    Soldier,
    /// ♜
    Rook,
    /// ♞
    Knight,
    /// ♝
    Bishop,
    /// ♛
    Queen,
    /// ♚, black's king-equivalent.
    King,
    /// ♟
    Pawn,
}

impl PieceKind {
    /// Glyph used to label the piece.
    pub fn glyph(self) -> &'static str {
        match self {
            PieceKind::Chariot => "車",
            PieceKind::Horse => "馬",
            PieceKind::Elephant => "象",
            PieceKind::Advisor => "士",
            PieceKind::General => "帥",
            PieceKind::Cannon => "炮",
            PieceKind::Soldier => "兵",
            PieceKind::Rook => "♜",
            PieceKind::Knight => "♞",
            PieceKind::Bishop => "♝",
            PieceKind::Queen => "♛",
            PieceKind::King => "♚",
            PieceKind::Pawn => "♟",
        }
    }

    /// Looks up a kind by glyph.
    pub fn from_glyph(glyph: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.glyph() == glyph)
    }

    /// Whether capturing this piece ends the game.
    pub fn is_king_equivalent(self) -> bool {
        matches!(self, PieceKind::General | PieceKind::King)
    }
}

/// A piece on the board: an owner and a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_new::new)]
pub struct Piece {
    /// Owning side.
    pub side: Side,
    /// Piece kind.
    pub kind: PieceKind,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side, self.kind.glyph())
    }
}

/// Error returned when a piece code such as `"r-車"` cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Display, derive_more::Error)]
#[display("Unknown piece code: {_0:?}")]
pub struct PieceParseError(#[error(not(source))] pub String);

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (side, glyph) = s
            .split_once('-')
            .ok_or_else(|| PieceParseError(s.to_string()))?;
        match (Side::from_code(side), PieceKind::from_glyph(glyph)) {
            (Some(side), Some(kind)) => Ok(Piece::new(side, kind)),
            _ => Err(PieceParseError(s.to_string())),
        }
    }
}

/// A coordinate as received from a client, possibly off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, derive_new::new)]
#[display("({row}, {col})")]
pub struct Coord {
    /// Row, expected in `0..10`.
    pub row: i64,
    /// Column, expected in `0..9`.
    pub col: i64,
}

impl Coord {
    /// Converts to an on-board square, or `None` if out of bounds.
    pub fn to_square(self) -> Option<Square> {
        let row = usize::try_from(self.row).ok()?;
        let col = usize::try_from(self.col).ok()?;
        Square::new(row, col)
    }
}

/// A cell that is guaranteed to lie on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("({row}, {col})")]
pub struct Square {
    row: usize,
    col: usize,
}

impl Square {
    /// Creates a square, returning `None` outside `[0,10) x [0,9)`.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < ROWS && col < COLS).then_some(Self { row, col })
    }

    /// Row index.
    pub fn row(self) -> usize {
        self.row
    }

    /// Column index.
    pub fn col(self) -> usize {
        self.col
    }
}

impl From<Square> for Coord {
    fn from(square: Square) -> Self {
        // Board indices are tiny, the conversion cannot truncate.
        Coord::new(square.row as i64, square.col as i64)
    }
}

/// The 10x9 board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Piece>; COLS]; ROWS],
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }

    /// Creates a board with the fixed starting layout.
    pub fn starting() -> Self {
        use PieceKind::*;

        let mut board = Self::empty();
        let red = |kind| Some(Piece::new(Side::Red, kind));
        let black = |kind| Some(Piece::new(Side::Black, kind));

        let red_back = [
            Chariot, Horse, Elephant, Advisor, General, Advisor, Elephant, Horse, Chariot,
        ];
        for (col, kind) in red_back.into_iter().enumerate() {
            board.cells[0][col] = red(kind);
        }
        board.cells[2][1] = red(Cannon);
        board.cells[2][7] = red(Cannon);
        for col in [0, 2, 4, 6, 8] {
            board.cells[3][col] = red(Soldier);
        }

        // Eight back-rank pieces: column 8 of row 9 stays empty.
        let black_back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        for (col, kind) in black_back.into_iter().enumerate() {
            board.cells[9][col] = black(kind);
        }
        for col in 0..COLS {
            board.cells[8][col] = black(Pawn);
        }

        board
    }

    /// Returns the piece at the square, if any.
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square.row][square.col]
    }

    /// Places a piece on (or clears) the square.
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row][square.col] = piece;
    }

    /// Rows of the board, top (row 0) first.
    pub fn rows(&self) -> &[[Option<Piece>; COLS]; ROWS] {
        &self.cells
    }

    /// Iterates over all occupied squares.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter_map(move |(col, cell)| cell.map(|piece| (Square { row, col }, piece)))
        })
    }
}

/// Complete game state: board, turn and result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    current_turn: Side,
    winner: Option<Side>,
}

impl GameState {
    /// Creates the starting state: initial layout, red to move, no winner.
    pub fn new() -> Self {
        Self::with_board(Board::starting(), Side::Red)
    }

    /// Creates an in-progress state from an arbitrary board.
    pub fn with_board(board: Board, current_turn: Side) -> Self {
        Self {
            board,
            current_turn,
            winner: None,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    /// Whether a king-equivalent has been captured.
    pub fn game_over(&self) -> bool {
        self.winner.is_some()
    }

    /// The winning side, set exactly when the game is over.
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub(super) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(super) fn set_winner(&mut self, side: Side) {
        self.winner = Some(side);
    }

    pub(super) fn toggle_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_square_bounds() {
        assert!(Square::new(9, 8).is_some());
        assert!(Square::new(10, 0).is_none());
        assert!(Square::new(0, 9).is_none());
    }

    #[test]
    fn test_coord_rejects_negative() {
        assert_eq!(Coord::new(-1, 0).to_square(), None);
        assert_eq!(Coord::new(0, -3).to_square(), None);
        assert_eq!(Coord::new(4, 5).to_square(), Some(sq(4, 5)));
    }

    #[test]
    fn test_side_code() {
        for side in Side::iter() {
            assert_eq!(Side::from_code(&side.to_string()), Some(side));
        }
        assert_eq!(Side::Red.to_string(), "r");
        assert_eq!(Side::from_code("w"), None);
    }

    #[test]
    fn test_piece_code() {
        let general = Piece::new(Side::Red, PieceKind::General);
        assert_eq!(general.to_string(), "r-帥");
        assert_eq!("b-♚".parse::<Piece>(), Ok(Piece::new(Side::Black, PieceKind::King)));
        assert!("x-♚".parse::<Piece>().is_err());
        assert!("r".parse::<Piece>().is_err());
    }

    #[test]
    fn test_starting_layout_counts() {
        let board = Board::starting();
        let red = board.pieces().filter(|(_, p)| p.side == Side::Red).count();
        let black = board.pieces().filter(|(_, p)| p.side == Side::Black).count();
        assert_eq!(red, 16);
        assert_eq!(black, 17);
        assert_eq!(board.get(sq(9, 8)), None);
        assert_eq!(board.get(sq(0, 4)), Some(Piece::new(Side::Red, PieceKind::General)));
        assert_eq!(board.get(sq(9, 4)), Some(Piece::new(Side::Black, PieceKind::King)));
    }

    #[test]
    fn test_new_state_is_not_over() {
        let state = GameState::new();
        assert_eq!(state.current_turn(), Side::Red);
        assert!(!state.game_over());
        assert_eq!(state.winner(), None);
    }
}
