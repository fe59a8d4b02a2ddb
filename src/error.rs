use thiserror::Error;

use crate::types::{Color, Position};

/// Rejections produced by the game lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("illegal move at {position} for {color}")]
    IllegalMove { position: Position, color: Color },

    #[error("it is not {got}'s turn (expected {expected})")]
    NotYourTurn { expected: Color, got: Color },

    #[error("game is already over")]
    GameOver,

    #[error("row/col out of range: ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },

    #[error("{0} is controlled by an agent")]
    AgentSeat(Color),

    #[error("no agent is seated for {0}")]
    NoAgent(Color),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardParseError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("unexpected character {ch:?} at row {row}")]
    InvalidCell { row: usize, ch: char },

    #[error("squares {0:#018x} hold both colors")]
    Overlap(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("search depth must be within 1..={max}, got {depth}")]
    DepthOutOfRange { depth: u8, max: u8 },
}

/// Failures when driving an agent-only match to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("{0} agent produced no usable move")]
    AgentFailed(Color),

    #[error("match did not finish within {0} plies")]
    PlyLimit(usize),
}
