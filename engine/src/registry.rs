// ═══════════════════════════════════════════════════════════════════════
// Game registry — in-memory store of every game, keyed by GameId.
//
// Each game sits behind its own Mutex, so validate-then-execute for one
// game is serialized while other games proceed in parallel. Reads clone
// a consistent snapshot under the same lock. Events produced by an
// operation are published after the lock is released.
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::engine::{self, MoveReport};
use crate::error::{EngineResult, GameError};
use crate::events::{EventSink, GameEvent, LogSink};
use crate::orders::Move;
use crate::setup;
use crate::types::*;
use crate::validation::{validate_move, Validation};
use crate::visibility::{player_view, PlayerView};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    pub status: GameStatus,
    pub players: usize,
}

pub struct GameRegistry {
    games: DashMap<GameId, Arc<Mutex<GameState>>>,
    next_id: AtomicU32,
    config: GameConfig,
    sink: Arc<dyn EventSink>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        GameRegistry::new(GameConfig::default())
    }
}

impl GameRegistry {
    pub fn new(config: GameConfig) -> Self {
        GameRegistry::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: GameConfig, sink: Arc<dyn EventSink>) -> Self {
        GameRegistry {
            games: DashMap::new(),
            next_id: AtomicU32::new(1),
            config,
            sink,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn create_game(&self, name: impl Into<String>, seed: u64) -> GameId {
        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let state = setup::create_game(id, name, seed, self.config.clone());
        self.games.insert(id, Arc::new(Mutex::new(state)));
        id
    }

    /// Summaries of every game, oldest first.
    pub fn list(&self) -> Vec<GameSummary> {
        let handles: Vec<Arc<Mutex<GameState>>> =
            self.games.iter().map(|entry| Arc::clone(entry.value())).collect();
        let mut summaries: Vec<GameSummary> = handles
            .iter()
            .map(|handle| {
                let state = lock(handle);
                GameSummary {
                    id: state.id,
                    name: state.name.clone(),
                    status: state.status,
                    players: state.player_count(),
                }
            })
            .collect();
        summaries.sort_by_key(|s| s.id);
        summaries
    }

    pub fn delete(&self, id: GameId) -> EngineResult<()> {
        self.games
            .remove(&id)
            .map(|_| ())
            .ok_or(GameError::GameNotFound(id))
    }

    pub fn snapshot(&self, id: GameId) -> EngineResult<GameState> {
        self.read(id, |state| Ok(state.clone()))
    }

    pub fn view(&self, id: GameId, player: PlayerId) -> EngineResult<PlayerView> {
        self.read(id, |state| {
            require_player(state, player)?;
            Ok(player_view(state, player))
        })
    }

    pub fn join(&self, id: GameId, name: impl Into<String>) -> EngineResult<PlayerId> {
        self.write(id, |state| {
            let (player, event) = setup::add_player(state, name)?;
            Ok((player, vec![event]))
        })
    }

    pub fn leave(&self, id: GameId, player: PlayerId) -> EngineResult<()> {
        self.write(id, |state| Ok(((), vec![setup::remove_player(state, player)?])))
    }

    pub fn start(&self, id: GameId) -> EngineResult<()> {
        self.write(id, |state| Ok(((), setup::start_game(state)?)))
    }

    /// Dry run: what the engine would say about `mv` right now.
    pub fn validate(&self, id: GameId, player: PlayerId, mv: &Move) -> EngineResult<Validation> {
        self.read(id, |state| {
            require_player(state, player)?;
            GameError::expect_status(state.id, GameStatus::Started, state.status)?;
            Ok(validate_move(state, player, mv))
        })
    }

    /// Validates and executes a move under the game's lock. Moves from
    /// anyone but the current mover are refused before the engine runs.
    pub fn submit_move(&self, id: GameId, player: PlayerId, mv: &Move) -> EngineResult<MoveReport> {
        self.write(id, |state| {
            require_player(state, player)?;
            GameError::expect_status(state.id, GameStatus::Started, state.status)?;
            if state.current != Some(player) {
                return Err(GameError::NotYourTurn { player });
            }
            let report = engine::play_move(state, player, mv)?;
            let events = report.events.clone();
            Ok((report, events))
        })
    }

    fn handle(&self, id: GameId) -> EngineResult<Arc<Mutex<GameState>>> {
        self.games
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(GameError::GameNotFound(id))
    }

    fn read<T>(&self, id: GameId, f: impl FnOnce(&GameState) -> EngineResult<T>) -> EngineResult<T> {
        let handle = self.handle(id)?;
        let state = lock(&handle);
        f(&state)
    }

    fn write<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut GameState) -> EngineResult<(T, Vec<GameEvent>)>,
    ) -> EngineResult<T> {
        let handle = self.handle(id)?;
        let (value, events) = {
            let mut state = lock(&handle);
            f(&mut state)?
        };
        for event in &events {
            self.sink.publish(id, event);
        }
        Ok(value)
    }
}

fn lock(handle: &Mutex<GameState>) -> MutexGuard<'_, GameState> {
    handle.lock().unwrap_or_else(|e| e.into_inner())
}

fn require_player(state: &GameState, player: PlayerId) -> EngineResult<()> {
    match state.player(player) {
        Some(_) => Ok(()),
        None => Err(GameError::PlayerNotFound { game: state.id, player }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingSink;
    use crate::events::RosterAction;
    use crate::orders::Order;
    use std::thread;

    fn registry() -> (GameRegistry, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let reg = GameRegistry::with_sink(GameConfig::default(), sink.clone());
        (reg, sink)
    }

    #[test]
    fn test_lifecycle_events() {
        let (reg, sink) = registry();
        let id = reg.create_game("g", 9);
        let a = reg.join(id, "ann").unwrap();
        reg.join(id, "bob").unwrap();
        reg.join(id, "cat").unwrap();
        reg.start(id).unwrap();

        let kinds: Vec<&str> = sink.drain().iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(kinds, vec!["players", "players", "players", "state"]);
        assert_eq!(reg.list()[0].status, GameStatus::Started);
        assert_eq!(reg.view(id, a).unwrap().my_hand.len(), 4);
    }

    #[test]
    fn test_leave_emits_roster_event() {
        let (reg, sink) = registry();
        let id = reg.create_game("g", 9);
        let a = reg.join(id, "ann").unwrap();
        reg.leave(id, a).unwrap();
        let events = sink.drain();
        assert_eq!(
            events.last().map(|(_, e)| *e),
            Some(GameEvent::Players { action: RosterAction::Leave, player: a })
        );
        assert_eq!(reg.snapshot(id).unwrap().player_count(), 0);
    }

    #[test]
    fn test_unknown_game_and_player() {
        let (reg, _) = registry();
        assert!(matches!(reg.start(GameId(77)), Err(GameError::GameNotFound(GameId(77)))));
        let id = reg.create_game("g", 1);
        assert!(matches!(
            reg.view(id, PlayerId(5)),
            Err(GameError::PlayerNotFound { .. })
        ));
        reg.delete(id).unwrap();
        assert!(reg.delete(id).is_err());
        assert!(reg.list().is_empty());
    }

    #[test]
    fn test_validate_needs_started_game() {
        let (reg, _) = registry();
        let id = reg.create_game("g", 3);
        let a = reg.join(id, "ann").unwrap();
        let b = reg.join(id, "bob").unwrap();
        reg.join(id, "cat").unwrap();
        let mv = Move::new(
            Order::Deploy { color: Color::Red, to: b },
            Order::Deploy { color: Color::Red, to: a },
            None,
        );
        assert!(matches!(
            reg.validate(id, a, &mv),
            Err(GameError::WrongStatus { expected: GameStatus::Started, actual: GameStatus::Setup, .. })
        ));

        reg.start(id).unwrap();
        assert_eq!(reg.validate(id, a, &mv).unwrap().messages.len(), 3);
    }

    #[test]
    fn test_games_are_independent_across_threads() {
        let reg = Arc::new(GameRegistry::default());
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let reg = Arc::clone(&reg);
                thread::spawn(move || {
                    let id = reg.create_game(format!("g{}", seed), seed);
                    for name in ["ann", "bob", "cat"] {
                        reg.join(id, name).unwrap();
                    }
                    reg.start(id).unwrap();
                    id
                })
            })
            .collect();
        let mut ids: Vec<GameId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert!(reg.list().iter().all(|s| s.status == GameStatus::Started && s.players == 3));
    }
}
