use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// The eight ray directions as `(row delta, col delta)`, in scan order.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One of the two players. Black moves first.
///
/// Each color carries a sign (`+1` for Black, `-1` for White) so that
/// negation yields the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// `+1` for Black, `-1` for White.
    pub fn sign(self) -> i32 {
        match self {
            Self::Black => 1,
            Self::White => -1,
        }
    }
}

impl Neg for Color {
    type Output = Color;

    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// Content of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Stable numeric encoding exposed to callers: 0=empty, 1=black, -1=white.
    pub fn code(self) -> i8 {
        match self {
            Self::Empty => 0,
            Self::Black => 1,
            Self::White => -1,
        }
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Self::Empty => None,
            Self::Black => Some(Color::Black),
            Self::White => Some(Color::White),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Self::Black,
            Color::White => Self::White,
        }
    }
}

/// A board coordinate. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Builds a position without bounds checking beyond a debug assertion.
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!((row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE);
        Self { row, col }
    }

    /// Returns `None` when `(row, col)` falls outside the board.
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        is_on_board(row, col).then(|| Self::new(row as u8, col as u8))
    }

    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    pub fn from_index(idx: usize) -> Self {
        debug_assert!(idx < NUM_SQUARES);
        Self::new((idx / BOARD_SIZE) as u8, (idx % BOARD_SIZE) as u8)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Bounds check against the 8x8 extent.
pub fn is_on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "color")]
pub enum Outcome {
    Winner(Color),
    Draw,
}

impl Outcome {
    /// Decides the result strictly by disc count.
    pub fn from_counts(black_count: u8, white_count: u8) -> Self {
        match black_count.cmp(&white_count) {
            std::cmp::Ordering::Greater => Self::Winner(Color::Black),
            std::cmp::Ordering::Less => Self::Winner(Color::White),
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Self::Winner(color) => Some(color),
            Self::Draw => None,
        }
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    /// Row-major cell codes (see [`Cell::code`]).
    pub board: Vec<i8>,
    pub current_player: Color,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the last recorded turn was a pass.
    /// - `false` after a normal move or at the start of a game.
    pub is_pass: bool,
    /// Contract:
    /// - Normal move: flipped positions in row-major order.
    /// - Pass or fresh game: empty.
    pub flipped: Vec<Position>,
    pub last_move: Option<Position>,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub black_count: u8,
    pub white_count: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negating_a_color_yields_the_opponent() {
        assert_eq!(-Color::Black, Color::White);
        assert_eq!(-Color::White, Color::Black);
        assert_eq!(Color::Black.sign(), -Color::White.sign());
    }

    #[test]
    fn cell_codes_are_stable() {
        assert_eq!(Cell::Empty.code(), 0);
        assert_eq!(Cell::from(Color::Black).code(), 1);
        assert_eq!(Cell::from(Color::White).code(), -1);
    }

    #[test]
    fn positions_order_row_major() {
        let mut positions = vec![Position::new(3, 0), Position::new(0, 7), Position::new(0, 2)];
        positions.sort();

        assert_eq!(positions, vec![Position::new(0, 2), Position::new(0, 7), Position::new(3, 0)]);
        assert_eq!(Position::from_index(Position::new(5, 4).index()), Position::new(5, 4));
    }

    #[test]
    fn checked_rejects_off_board_coordinates() {
        assert_eq!(Position::checked(-1, 0), None);
        assert_eq!(Position::checked(0, 8), None);
        assert_eq!(Position::checked(7, 7), Some(Position::new(7, 7)));
    }

    #[test]
    fn outcome_is_decided_by_disc_count() {
        assert_eq!(Outcome::from_counts(40, 24), Outcome::Winner(Color::Black));
        assert_eq!(Outcome::from_counts(10, 11), Outcome::Winner(Color::White));
        assert_eq!(Outcome::from_counts(32, 32), Outcome::Draw);
    }
}
