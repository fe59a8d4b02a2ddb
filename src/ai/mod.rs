pub mod agent;
pub mod eval;
pub mod search;

pub use agent::{Agent, RandomAgent, SearchAgent};
pub use eval::{DiscDifferential, Evaluator, EvaluatorKind, Positional};
pub use search::{SearchEngine, SearchOutcome, SearchStats};
