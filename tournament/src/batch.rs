// ═══════════════════════════════════════════════════════════════════════
// Tournament batches — many seeded games in parallel on one registry.
//
// Every game gets its own seed (base + index * 1000), so a batch is
// reproducible regardless of how rayon schedules it.
// ═══════════════════════════════════════════════════════════════════════

use crate::runner::{run_game, AgentKind, GameResult};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use shinobi_engine::GameRegistry;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub games: u32,
    pub players: usize,
    pub agent: AgentKind,
    pub base_seed: u64,
    pub max_moves: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            games: 100,
            players: 4,
            agent: AgentKind::Random,
            base_seed: 42,
            max_moves: 1_000,
        }
    }
}

impl BatchConfig {
    pub fn seed_for(&self, game: u32) -> u64 {
        self.base_seed.wrapping_add(game as u64 * 1000)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: u32,
    pub errors: u32,
    /// Games won by more than one player.
    pub shared_victories: u32,
    /// Wins per seat in turn order; shared wins count for every winner.
    pub wins_by_seat: Vec<u32>,
    pub wins_by_agent: BTreeMap<String, u32>,
    pub average_moves: f64,
}

impl BatchSummary {
    pub fn from_results(config: &BatchConfig, results: &[Result<GameResult, String>]) -> Self {
        let mut summary = BatchSummary {
            games: results.len() as u32,
            wins_by_seat: vec![0; config.players],
            ..BatchSummary::default()
        };
        let mut total_moves = 0u64;
        let mut finished = 0u64;

        for result in results {
            let result = match result {
                Ok(r) => r,
                Err(_) => {
                    summary.errors += 1;
                    continue;
                }
            };
            finished += 1;
            total_moves += result.moves_played as u64;
            if result.shared_victory() {
                summary.shared_victories += 1;
            }
            for pr in result.player_results.iter().filter(|p| p.won) {
                if let Some(w) = summary.wins_by_seat.get_mut(pr.seat) {
                    *w += 1;
                }
                *summary.wins_by_agent.entry(pr.agent_name.clone()).or_insert(0) += 1;
            }
        }
        if finished > 0 {
            summary.average_moves = total_moves as f64 / finished as f64;
        }
        summary
    }
}

/// Runs the whole batch, results in game order. Failed games carry the
/// error text.
pub fn run_batch(registry: &GameRegistry, config: &BatchConfig) -> Vec<Result<GameResult, String>> {
    (0..config.games)
        .into_par_iter()
        .map(|g| {
            let seed = config.seed_for(g);
            run_game(registry, seed, config.players, config.agent, config.max_moves).map_err(|e| {
                warn!("game {} (seed {}): {}", g + 1, seed, e);
                e.to_string()
            })
        })
        .collect()
}
