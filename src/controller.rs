use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::ai::agent::Agent;
use crate::config::MatchConfig;
use crate::error::{ConfigError, GameError, MatchError};
use crate::game::{GameState, PlyReport};
use crate::types::{Color, Outcome};

/// Drives one [`GameState`] with an optional agent seated for each color.
///
/// Agents only ever see a copy of the live board. A panicking agent, or
/// one that answers with an unplayable move, is reported as "no move" and
/// leaves the game untouched.
pub struct MatchController {
    game: GameState,
    black: Option<Box<dyn Agent>>,
    white: Option<Box<dyn Agent>>,
}

impl MatchController {
    pub fn new(black: Option<Box<dyn Agent>>, white: Option<Box<dyn Agent>>) -> Self {
        Self {
            game: GameState::new(),
            black,
            white,
        }
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self, ConfigError> {
        let black = config.black.as_ref().map(|c| c.build()).transpose()?;
        let white = config.white.as_ref().map(|c| c.build()).transpose()?;
        Ok(Self::new(black, white))
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    pub fn restart(&mut self) {
        self.game = GameState::new();
        debug!("match restarted");
    }

    pub fn is_agent_turn(&self) -> bool {
        !self.game.is_over() && self.seat(self.game.mover()).is_some()
    }

    /// Applies a move for a human-controlled seat.
    pub fn human_move(&mut self, row: i32, col: i32) -> Result<PlyReport, GameError> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        let color = self.game.mover();
        if self.seat(color).is_some() {
            return Err(GameError::AgentSeat(color));
        }
        self.game.place(row, col)
    }

    /// Asks the seated agent for a move and applies it.
    ///
    /// `Ok(None)` means the agent produced nothing usable.
    pub fn agent_move(&mut self) -> Result<Option<PlyReport>, GameError> {
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        let color = self.game.mover();
        let snapshot = *self.game.board();
        let agent = self.seat_mut(color).ok_or(GameError::NoAgent(color))?;
        let name = agent.name().to_owned();

        let choice = panic::catch_unwind(AssertUnwindSafe(|| agent.choose_move(&snapshot, color)));
        let mv = match choice {
            Ok(Some(mv)) => mv,
            Ok(None) => {
                warn!(agent = %name, color = %color, "agent returned no move");
                return Ok(None);
            }
            Err(payload) => {
                warn!(
                    agent = %name,
                    color = %color,
                    panic = panic_message(payload.as_ref()),
                    "agent panicked"
                );
                return Ok(None);
            }
        };

        match self.game.try_apply(color, mv) {
            Ok(report) => Ok(Some(report)),
            Err(err) => {
                warn!(agent = %name, color = %color, error = %err, "agent move rejected");
                Ok(None)
            }
        }
    }

    /// Plays agent moves until the game ends.
    pub fn play_out(&mut self, max_plies: usize) -> Result<Outcome, MatchError> {
        let mut plies = 0;
        loop {
            if let Some(outcome) = self.game.winner() {
                return Ok(outcome);
            }
            if plies >= max_plies {
                return Err(MatchError::PlyLimit(max_plies));
            }
            let color = self.game.mover();
            if self.agent_move()?.is_none() {
                return Err(MatchError::AgentFailed(color));
            }
            plies += 1;
        }
    }

    fn seat(&self, color: Color) -> Option<&dyn Agent> {
        match color {
            Color::Black => self.black.as_deref(),
            Color::White => self.white.as_deref(),
        }
    }

    fn seat_mut(&mut self, color: Color) -> Option<&mut Box<dyn Agent>> {
        match color {
            Color::Black => self.black.as_mut(),
            Color::White => self.white.as_mut(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::agent::{RandomAgent, SearchAgent};
    use crate::ai::eval::DiscDifferential;
    use crate::board::Board;
    use crate::config::{AgentConfig, Difficulty};
    use crate::types::Position;

    struct PanickingAgent;

    impl Agent for PanickingAgent {
        fn name(&self) -> &str {
            "panicking"
        }

        fn choose_move(&mut self, _board: &Board, _color: Color) -> Option<Position> {
            panic!("evaluator blew up");
        }
    }

    struct FixedAgent(Position);

    impl Agent for FixedAgent {
        fn name(&self) -> &str {
            "fixed"
        }

        fn choose_move(&mut self, _board: &Board, _color: Color) -> Option<Position> {
            Some(self.0)
        }
    }

    #[test]
    fn agent_vs_agent_plays_to_completion() {
        let mut controller = MatchController::new(
            Some(Box::new(RandomAgent::seeded(5))),
            Some(Box::new(SearchAgent::new(1, DiscDifferential))),
        );

        let outcome = controller.play_out(200).unwrap();

        let (black, white) = controller.game().score();
        assert_eq!(outcome, Outcome::from_counts(black, white));
        assert!(controller.game().is_over());
        assert!(!controller.is_agent_turn());
    }

    #[test]
    fn panicking_agent_yields_no_move_and_keeps_state() {
        let mut controller = MatchController::new(Some(Box::new(PanickingAgent)), None);
        let before = *controller.game().board();

        assert_eq!(controller.agent_move(), Ok(None));
        assert_eq!(*controller.game().board(), before);
        assert_eq!(controller.game().current_player(), Color::Black);
        assert_eq!(controller.play_out(10), Err(MatchError::AgentFailed(Color::Black)));
    }

    #[test]
    fn illegal_agent_answer_is_discarded() {
        let mut controller =
            MatchController::new(Some(Box::new(FixedAgent(Position::new(0, 0)))), None);

        assert_eq!(controller.agent_move(), Ok(None));
        assert!(controller.game().history().is_empty());
    }

    #[test]
    fn seats_gate_human_and_agent_moves() {
        let config = MatchConfig::player_vs_agent(Difficulty::Beginner);
        let mut controller = MatchController::from_config(&config).unwrap();

        assert!(!controller.is_agent_turn());
        assert_eq!(controller.agent_move(), Err(GameError::NoAgent(Color::Black)));
        controller.human_move(2, 3).unwrap();

        assert!(controller.is_agent_turn());
        assert_eq!(controller.human_move(2, 2), Err(GameError::AgentSeat(Color::White)));
        let report = controller.agent_move().unwrap().unwrap();
        assert_eq!(report.record.color, Color::White);
        assert_eq!(controller.game().current_player(), Color::Black);
    }

    #[test]
    fn agents_keep_playing_after_rewinding_over_a_pass() {
        let board = Board::from_ascii(
            "
            . W B . . . . .
            . B . . . . . .
            . . B . . . . .
            . . . B . . . .
            . . . . B . . .
            . . . . . W . .
            . . . . . . . .
            . . . . . . . .
            ",
        )
        .unwrap();
        let mut controller = MatchController::new(
            Some(Box::new(SearchAgent::new(2, DiscDifferential))),
            Some(Box::new(RandomAgent::seeded(4))),
        );
        *controller.game_mut() = GameState::from_position(board, Color::Black);
        let report = controller.agent_move().unwrap().unwrap();
        assert_eq!(report.passed, Some(Color::White));

        assert!(controller.game_mut().step_back());
        assert_eq!(controller.game().current_player(), Color::White);
        assert!(controller.is_agent_turn());

        let report = controller.agent_move().unwrap().unwrap();
        assert_eq!(report.record.color, Color::Black);
        assert_eq!(controller.play_out(10), Ok(Outcome::Winner(Color::Black)));
    }

    #[test]
    fn restart_resets_the_game() {
        let config = MatchConfig::agent_vs_agent(
            AgentConfig::Random { seed: Some(1) },
            AgentConfig::Random { seed: Some(2) },
        );
        let mut controller = MatchController::from_config(&config).unwrap();
        controller.agent_move().unwrap();

        controller.restart();

        assert_eq!(*controller.game().board(), Board::new());
        assert!(controller.game().history().is_empty());
    }
}
