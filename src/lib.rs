pub mod ai;
pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod types;
pub mod wasm;

pub use ai::{Agent, DiscDifferential, Evaluator, Positional, RandomAgent, SearchAgent, SearchEngine};
pub use board::{Board, FlipRecord, Fingerprint};
pub use config::{AgentConfig, Difficulty, MatchConfig};
pub use controller::MatchController;
pub use error::{BoardParseError, ConfigError, GameError, MatchError};
pub use game::{GameState, GameStatus, PlyReport, Turn};
pub use types::{Cell, Color, GameResult, GameSnapshot, Outcome, Position};
