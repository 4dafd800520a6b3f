pub mod runner;
pub mod batch;

pub use runner::{make_agents, run_game, AgentKind, GameResult, PlayerResult, RunError};
pub use batch::{run_batch, BatchConfig, BatchSummary};
