use tracing::debug;
use web_time::Instant;

use crate::ai::eval::{DiscDifferential, Evaluator};
use crate::board::{Board, squares};
use crate::types::{Color, Position};

pub const MIN_SCORE: i32 = i32::MIN;
pub const MAX_SCORE: i32 = i32::MAX;

/// The color whose score the tree maximizes. Its opponent minimizes.
pub const MAXIMIZER: Color = Color::Black;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` when the mover has no legal destination.
    pub best_move: Option<Position>,
    pub score: Option<i32>,
    pub stats: SearchStats,
}

/// Fixed-depth minimax with alpha-beta pruning.
///
/// Scores follow a fixed sign convention: [`MAXIMIZER`] picks the largest
/// child score, its opponent the smallest. Leaves are scored by the
/// evaluator from:
/// - the side that just moved, when the depth budget runs out;
/// - the side to move, when it has no legal destination.
///
/// The root does not consume depth, so `depth` counts the plies searched
/// below each candidate move.
#[derive(Debug, Default, Clone)]
pub struct SearchEngine<E = DiscDifferential> {
    evaluator: E,
}

impl<E: Evaluator> SearchEngine<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Best move for `mover`, or `None` when it has to pass.
    /// Ties keep the first candidate in row-major order.
    pub fn choose_move(&self, board: &Board, mover: Color, depth: u8) -> Option<Position> {
        self.analyse(board, mover, depth).best_move
    }

    /// Scores the position with `mover` to play inside the `(alpha, beta)` window.
    pub fn search(&self, board: &Board, depth: u8, mover: Color, alpha: i32, beta: i32) -> i32 {
        let mut scratch = *board;
        let mut searcher = Searcher::new(&self.evaluator);
        searcher.alphabeta(&mut scratch, depth, mover, alpha, beta)
    }

    pub fn analyse(&self, board: &Board, mover: Color, depth: u8) -> SearchOutcome {
        let started = Instant::now();
        let mut scratch = *board;
        let mut searcher = Searcher::new(&self.evaluator);
        let mut best: Option<(Position, i32)> = None;

        for idx in squares(board.legal_mask(mover)) {
            let mv = Position::from_index(idx);
            let Some(record) = scratch.apply_move(mv, mover) else {
                continue;
            };
            let score = searcher.alphabeta(&mut scratch, depth, -mover, MIN_SCORE, MAX_SCORE);
            scratch.undo_move(&record);

            let improves = match best {
                None => true,
                Some((_, best_score)) if mover == MAXIMIZER => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
            }
        }
        debug_assert_eq!(scratch, *board, "search left the scratch board modified");

        let stats = searcher.stats;
        debug!(
            mover = %mover,
            depth,
            best_move = ?best.map(|(mv, _)| mv),
            score = ?best.map(|(_, score)| score),
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "search finished"
        );

        SearchOutcome {
            best_move: best.map(|(mv, _)| mv),
            score: best.map(|(_, score)| score),
            stats,
        }
    }
}

struct Searcher<'a, E> {
    evaluator: &'a E,
    stats: SearchStats,
}

impl<'a, E: Evaluator> Searcher<'a, E> {
    fn new(evaluator: &'a E) -> Self {
        Self {
            evaluator,
            stats: SearchStats::default(),
        }
    }

    /// Mutates `board` while descending and restores it before returning.
    fn alphabeta(
        &mut self,
        board: &mut Board,
        depth: u8,
        mover: Color,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;

        if depth == 0 {
            self.stats.leaves += 1;
            return self.evaluator.evaluate(board, -mover);
        }

        let legal = board.legal_mask(mover);
        if legal == 0 {
            self.stats.leaves += 1;
            return self.evaluator.evaluate(board, mover);
        }

        let maximizing = mover == MAXIMIZER;
        let mut best = if maximizing { MIN_SCORE } else { MAX_SCORE };

        for idx in squares(legal) {
            let Some(record) = board.apply_move(Position::from_index(idx), mover) else {
                continue;
            };
            let score = self.alphabeta(board, depth - 1, -mover, alpha, beta);
            board.undo_move(&record);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}
