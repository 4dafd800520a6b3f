// ═══════════════════════════════════════════════════════════════════════
// Game events — what the engine reports to the outside world.
// Delivery (push streams, sockets) belongs to the caller; sinks here only
// log or collect.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{GameId, GameStatus, PlayerId};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterAction {
    Join,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum GameEvent {
    Players { action: RosterAction, player: PlayerId },
    State(GameStatus),
    CurrentPlayer(PlayerId),
}

impl GameEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::Players { .. } => "players",
            GameEvent::State(_) => "state",
            GameEvent::CurrentPlayer(_) => "current_player",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            GameEvent::Players { action, player } => json!({ "action": action, "player": player }),
            GameEvent::State(status) => json!(status),
            GameEvent::CurrentPlayer(player) => json!(player),
        }
    }
}

/// Receives every event the registry emits, in order, per game.
pub trait EventSink: Send + Sync {
    fn publish(&self, game: GameId, event: &GameEvent);
}

/// Writes events to the log at info level.
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, game: GameId, event: &GameEvent) {
        info!("game {} {}: {}", game, event.kind(), event.payload());
    }
}

/// Keeps events in memory until drained. Useful for tests and for
/// callers that forward events in batches.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<(GameId, GameEvent)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<(GameId, GameEvent)> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *events)
    }
}

impl EventSink for CollectingSink {
    fn publish(&self, game: GameId, event: &GameEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((game, *event));
    }
}
