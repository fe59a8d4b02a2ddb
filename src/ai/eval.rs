use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{Cell, Color, NUM_SQUARES};

/// Static corner/edge weights, row-major.
const POSITIONAL_WEIGHTS: [i32; NUM_SQUARES] = [
    100, -20, 10, 5, 5, 10, -20, 100, //
    -20, -50, -2, -2, -2, -2, -50, -20, //
    10, -2, -1, -1, -1, -1, -2, 10, //
    5, -2, -1, -1, -1, -1, -2, 5, //
    5, -2, -1, -1, -1, -1, -2, 5, //
    10, -2, -1, -1, -1, -1, -2, 10, //
    -20, -50, -2, -2, -2, -2, -50, -20, //
    100, -20, 10, 5, 5, 10, -20, 100, //
];

/// Leaf scoring, signed from the perspective of `color`.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, board: &Board, color: Color) -> i32;
}

impl<F> Evaluator for F
where
    F: Fn(&Board, Color) -> i32 + Send + Sync,
{
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        self(board, color)
    }
}

/// Own discs minus opponent discs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscDifferential;

impl Evaluator for DiscDifferential {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        board.count(color) as i32 - board.count(-color) as i32
    }
}

/// Sum of square weights held by `color` minus those held by the opponent.
#[derive(Debug, Default, Clone, Copy)]
pub struct Positional;

impl Evaluator for Positional {
    fn evaluate(&self, board: &Board, color: Color) -> i32 {
        let own = Cell::from(color);
        board
            .to_array()
            .iter()
            .zip(POSITIONAL_WEIGHTS)
            .map(|(&cell, weight)| match cell {
                Cell::Empty => 0,
                c if c == own => weight,
                _ => -weight,
            })
            .sum()
    }
}

/// Serializable evaluator selector used by agent configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    #[default]
    Disc,
    Positional,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn disc_differential_is_antisymmetric() {
        let mut board = Board::new();
        board.apply_move(Position::new(2, 3), Color::Black).unwrap();

        assert_eq!(DiscDifferential.evaluate(&board, Color::Black), 3);
        assert_eq!(DiscDifferential.evaluate(&board, Color::White), -3);
    }

    #[test]
    fn positional_rewards_corners() {
        let board = Board::from_ascii(
            "
            B . . . . . . W
            . . . . . . W .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();

        // Black: corner 100. White: corner 100 plus x-square -50.
        assert_eq!(Positional.evaluate(&board, Color::Black), 50);
        assert_eq!(Positional.evaluate(&board, Color::White), -50);
    }

    #[test]
    fn closures_act_as_evaluators() {
        let constant = |_: &Board, _: Color| 7;

        assert_eq!(constant.evaluate(&Board::new(), Color::White), 7);
    }

    #[test]
    fn weight_table_is_symmetric() {
        for row in 0..8 {
            for col in 0..8 {
                let w = POSITIONAL_WEIGHTS[row * 8 + col];
                assert_eq!(w, POSITIONAL_WEIGHTS[col * 8 + row]);
                assert_eq!(w, POSITIONAL_WEIGHTS[(7 - row) * 8 + col]);
            }
        }
    }
}
