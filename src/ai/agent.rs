use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;
use tracing::trace;
use web_time::SystemTime;

use crate::ai::eval::{DiscDifferential, Evaluator, Positional};
use crate::ai::search::SearchEngine;
use crate::board::Board;
use crate::types::{Color, Position};

pub const INTERMEDIATE_DEPTH: u8 = 3;
pub const ADVANCED_DEPTH: u8 = 5;

/// Picks a move for `color` on a board snapshot.
///
/// Agents never keep the board between calls; `None` means the agent has
/// nothing to play and the caller should treat the turn as a pass.
pub trait Agent: Send {
    fn name(&self) -> &str;

    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Position>;
}

/// Uniform choice among the legal moves.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: ChaCha8Rng,
}

impl RandomAgent {
    /// Seeds from the wall clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::seeded(seed)
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Position> {
        let moves = board.legal_moves(color);
        let choice = moves.choose(&mut self.rng).copied();
        trace!(color = %color, candidates = moves.len(), choice = ?choice, "random agent");
        choice
    }
}

/// Fixed-depth alpha-beta search.
#[derive(Debug, Clone)]
pub struct SearchAgent<E = DiscDifferential> {
    engine: SearchEngine<E>,
    depth: u8,
}

impl<E: Evaluator> SearchAgent<E> {
    pub fn new(depth: u8, evaluator: E) -> Self {
        Self {
            engine: SearchEngine::new(evaluator),
            depth,
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }
}

impl SearchAgent<Positional> {
    pub fn intermediate() -> Self {
        Self::new(INTERMEDIATE_DEPTH, Positional)
    }
}

impl SearchAgent<DiscDifferential> {
    pub fn advanced() -> Self {
        Self::new(ADVANCED_DEPTH, DiscDifferential)
    }
}

impl<E: Evaluator> Agent for SearchAgent<E> {
    fn name(&self) -> &str {
        "minimax"
    }

    fn choose_move(&mut self, board: &Board, color: Color) -> Option<Position> {
        self.engine.choose_move(board, color, self.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_agent_only_returns_legal_moves() {
        let mut agent = RandomAgent::seeded(42);
        let board = Board::new();
        let legal = board.legal_moves(Color::Black);

        for _ in 0..32 {
            let mv = agent.choose_move(&board, Color::Black).unwrap();
            assert!(legal.contains(&mv));
        }
    }

    #[test]
    fn random_agent_covers_every_candidate() {
        let mut agent = RandomAgent::seeded(1);
        let board = Board::new();
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..200 {
            seen.extend(agent.choose_move(&board, Color::White));
        }

        assert_eq!(seen.into_iter().collect::<Vec<_>>(), board.legal_moves(Color::White));
    }

    #[test]
    fn same_seed_gives_same_choices() {
        let board = Board::new();
        let mut a = RandomAgent::seeded(9);
        let mut b = RandomAgent::seeded(9);

        for _ in 0..10 {
            assert_eq!(
                a.choose_move(&board, Color::Black),
                b.choose_move(&board, Color::Black)
            );
        }
    }

    #[test]
    fn agents_return_none_without_legal_moves() {
        let board = Board::from_bitboards(u64::MAX ^ 1, 0).unwrap();

        assert_eq!(RandomAgent::seeded(0).choose_move(&board, Color::White), None);
        assert_eq!(SearchAgent::advanced().choose_move(&board, Color::White), None);
    }

    #[test]
    fn search_agent_delegates_to_engine() {
        let board = Board::new();
        let mut agent = SearchAgent::new(1, DiscDifferential);

        assert_eq!(
            agent.choose_move(&board, Color::Black),
            SearchEngine::new(DiscDifferential).choose_move(&board, Color::Black, 1)
        );
        assert_eq!(SearchAgent::intermediate().depth(), INTERMEDIATE_DEPTH);
        assert!(SearchAgent::advanced().depth() > SearchAgent::intermediate().depth());
    }

    #[test]
    fn agents_work_behind_a_trait_object() {
        let mut agents: Vec<Box<dyn Agent>> = Vec::new();
        agents.push(Box::new(RandomAgent::seeded(3)));
        agents.push(Box::new(SearchAgent::new(2, Positional)));
        let board = Board::new();

        for agent in &mut agents {
            let mv = agent.choose_move(&board, Color::Black).unwrap();
            assert!(board.is_legal(mv, Color::Black));
        }
    }
}
