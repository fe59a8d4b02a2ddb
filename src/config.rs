use serde::{Deserialize, Serialize};

use crate::ai::agent::{ADVANCED_DEPTH, Agent, INTERMEDIATE_DEPTH, RandomAgent, SearchAgent};
use crate::ai::eval::{DiscDifferential, EvaluatorKind, Positional};
use crate::error::ConfigError;

pub const MAX_SEARCH_DEPTH: u8 = 8;

/// How an agent seat is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentConfig {
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    Minimax {
        depth: u8,
        #[serde(default)]
        evaluator: EvaluatorKind,
    },
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Random { .. } => Ok(()),
            Self::Minimax { depth, .. } if depth == 0 || depth > MAX_SEARCH_DEPTH => {
                Err(ConfigError::DepthOutOfRange {
                    depth,
                    max: MAX_SEARCH_DEPTH,
                })
            }
            Self::Minimax { .. } => Ok(()),
        }
    }

    pub fn build(&self) -> Result<Box<dyn Agent>, ConfigError> {
        self.validate()?;
        Ok(match *self {
            Self::Random { seed: Some(seed) } => Box::new(RandomAgent::seeded(seed)),
            Self::Random { seed: None } => Box::new(RandomAgent::new()),
            Self::Minimax {
                depth,
                evaluator: EvaluatorKind::Disc,
            } => Box::new(SearchAgent::new(depth, DiscDifferential)),
            Self::Minimax {
                depth,
                evaluator: EvaluatorKind::Positional,
            } => Box::new(SearchAgent::new(depth, Positional)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl From<Difficulty> for AgentConfig {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Beginner => Self::Random { seed: None },
            Difficulty::Intermediate => Self::Minimax {
                depth: INTERMEDIATE_DEPTH,
                evaluator: EvaluatorKind::Positional,
            },
            Difficulty::Advanced => Self::Minimax {
                depth: ADVANCED_DEPTH,
                evaluator: EvaluatorKind::Disc,
            },
        }
    }
}

/// Seat assignment for a match. `None` is a human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub black: Option<AgentConfig>,
    #[serde(default)]
    pub white: Option<AgentConfig>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::player_vs_agent(Difficulty::Advanced)
    }
}

impl MatchConfig {
    pub fn player_vs_player() -> Self {
        Self {
            black: None,
            white: None,
        }
    }

    /// Human plays Black against an agent playing White.
    pub fn player_vs_agent(difficulty: Difficulty) -> Self {
        Self {
            black: None,
            white: Some(difficulty.into()),
        }
    }

    pub fn agent_vs_agent(black: AgentConfig, white: AgentConfig) -> Self {
        Self {
            black: Some(black),
            white: Some(white),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.black.iter().chain(self.white.iter()).try_for_each(AgentConfig::validate)
    }
}
