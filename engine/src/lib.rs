pub mod types;
pub mod config;
pub mod error;
pub mod cards;
pub mod orders;
pub mod validation;
pub mod moves;
pub mod setup;
pub mod engine;
pub mod scoring;
pub mod visibility;
pub mod events;
pub mod registry;


pub use types::*;
pub use config::{ConfigError, GameConfig};
pub use error::{EngineResult, GameError};
pub use orders::{parse_move, Move, Order, OrderKind, Slot};
pub use validation::{validate_move, Snapshot, Validation};
pub use engine::MoveReport;
pub use events::{EventSink, GameEvent};
pub use registry::{GameRegistry, GameSummary};
