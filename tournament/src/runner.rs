// ═══════════════════════════════════════════════════════════════════════
// Game Runner — runs a complete headless game with agents
//
// Games are driven through a GameRegistry exactly the way a remote
// client would: join, start, then submit the current player's move until
// the game reports `ended`.
// ═══════════════════════════════════════════════════════════════════════

use log::{debug, info};
use serde::{Deserialize, Serialize};
use shinobi_agents::{Agent, HeuristicAgent, RandomAgent};
use shinobi_engine::scoring::{self, Standing};
use shinobi_engine::types::*;
use shinobi_engine::{GameError, GameRegistry};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which agents fill the seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Random,
    Heuristic,
    /// Alternating heuristic and random seats, heuristic first.
    Mixed,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgentKind::Random => "random",
            AgentKind::Heuristic => "heuristic",
            AgentKind::Mixed => "mixed",
        })
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(AgentKind::Random),
            "heuristic" => Ok(AgentKind::Heuristic),
            "mixed" => Ok(AgentKind::Mixed),
            other => Err(format!("unknown agent type '{}'", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] GameError),

    #[error("no agent for player {0}")]
    NoAgent(PlayerId),

    #[error("player {player} found no legal move after {moves} moves")]
    Stalled { player: PlayerId, moves: usize },

    #[error("game exceeded {0} moves without finishing")]
    TooLong(usize),
}

/// Result of a completed game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: u64,
    pub game: GameId,
    pub moves_played: u32,
    pub winners: Vec<PlayerId>,
    pub player_results: Vec<PlayerResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Position in turn order, starting at 0.
    pub seat: usize,
    pub agent_name: String,
    pub standing: Standing,
    pub won: bool,
}

impl GameResult {
    pub fn shared_victory(&self) -> bool {
        self.winners.len() > 1
    }
}

/// One agent per seat, seeded from the game seed.
pub fn make_agents(kind: AgentKind, seats: &[PlayerId], seed: u64) -> Vec<Box<dyn Agent>> {
    seats
        .iter()
        .enumerate()
        .map(|(i, &player)| {
            let agent_seed = seed.wrapping_add(i as u64);
            let agent: Box<dyn Agent> = match kind {
                AgentKind::Heuristic => Box::new(HeuristicAgent::new(player, agent_seed)),
                AgentKind::Mixed if i % 2 == 0 => Box::new(HeuristicAgent::new(player, agent_seed)),
                AgentKind::Mixed | AgentKind::Random => Box::new(RandomAgent::new(player, agent_seed)),
            };
            agent
        })
        .collect()
}

/// Plays one full game on `registry` and removes it again afterwards.
pub fn run_game(
    registry: &GameRegistry,
    seed: u64,
    player_count: usize,
    kind: AgentKind,
    max_moves: usize, // safety limit to prevent infinite loops
) -> Result<GameResult, RunError> {
    let id = registry.create_game(format!("game-{}", seed), seed);
    let result = play(registry, id, seed, player_count, kind, max_moves);
    registry.delete(id).ok();
    result
}

fn play(
    registry: &GameRegistry,
    id: GameId,
    seed: u64,
    player_count: usize,
    kind: AgentKind,
    max_moves: usize,
) -> Result<GameResult, RunError> {
    let seats = (1..=player_count)
        .map(|i| registry.join(id, format!("p{}", i)))
        .collect::<Result<Vec<PlayerId>, GameError>>()?;
    registry.start(id)?;

    let mut agents = make_agents(kind, &seats, seed);
    let mut moves = 0;

    loop {
        let state = registry.snapshot(id)?;
        if state.status == GameStatus::Ended {
            info!("game {} (seed {}) finished after {} moves", id, seed, moves);
            return Ok(build_result(&state, seed, &agents));
        }
        if moves >= max_moves {
            return Err(RunError::TooLong(max_moves));
        }

        let Some(current) = state.current else {
            return Err(RunError::Stalled { player: PlayerId(0), moves });
        };
        let agent = agents
            .iter_mut()
            .find(|a| a.player() == current)
            .ok_or(RunError::NoAgent(current))?;

        let view = registry.view(id, current)?;
        let mv = agent
            .decide(&view)
            .ok_or(RunError::Stalled { player: current, moves })?;
        let report = registry.submit_move(id, current, &mv)?;
        debug!("game {} move {}: {}", id, moves + 1, report.log.join(", "));
        moves += 1;
    }
}

fn build_result(state: &GameState, seed: u64, agents: &[Box<dyn Agent>]) -> GameResult {
    let player_results = scoring::standings(state)
        .into_iter()
        .enumerate()
        .map(|(seat, standing)| PlayerResult {
            seat,
            agent_name: agents
                .iter()
                .find(|a| a.player() == standing.player)
                .map(|a| a.name().to_string())
                .unwrap_or_default(),
            won: state.winners.contains(&standing.player),
            standing,
        })
        .collect();

    GameResult {
        seed,
        game: state.id,
        moves_played: state.moves_played,
        winners: state.winners.clone(),
        player_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_game_all_player_counts() {
        let registry = GameRegistry::default();
        for n in 3..=5 {
            let result = run_game(&registry, 42, n, AgentKind::Random, 1_000).unwrap();
            assert_eq!(result.player_results.len(), n);
            assert!(!result.winners.is_empty());
            assert!(result.player_results.iter().any(|p| p.won));
        }
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_deterministic_results() {
        let registry = GameRegistry::default();
        let a = run_game(&registry, 7, 4, AgentKind::Mixed, 1_000).unwrap();
        let b = run_game(&registry, 7, 4, AgentKind::Mixed, 1_000).unwrap();
        assert_eq!(a.winners, b.winners);
        assert_eq!(a.moves_played, b.moves_played);
    }

    #[test]
    fn test_move_limit() {
        let registry = GameRegistry::default();
        let err = run_game(&registry, 1, 3, AgentKind::Random, 2).unwrap_err();
        assert!(matches!(err, RunError::TooLong(2)));
    }

    #[test]
    fn test_bad_player_count() {
        let registry = GameRegistry::default();
        let err = run_game(&registry, 1, 2, AgentKind::Random, 100).unwrap_err();
        assert!(matches!(err, RunError::Engine(GameError::PlayerCount { .. })));
    }

    #[test]
    fn test_agent_kind_parses() {
        assert_eq!("Heuristic".parse::<AgentKind>().unwrap(), AgentKind::Heuristic);
        assert!("smart".parse::<AgentKind>().is_err());
    }
}
