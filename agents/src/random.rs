// ═══════════════════════════════════════════════════════════════════════
// Random Agent — plays a uniformly random legal move.
// Serves as baseline and for testing game engine stability.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shinobi_engine::moves;
use shinobi_engine::orders::Move;
use shinobi_engine::types::PlayerId;
use shinobi_engine::validation::Snapshot;
use shinobi_engine::visibility::PlayerView;

pub struct RandomAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        RandomAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str { "Random" }
    fn player(&self) -> PlayerId { self.player }

    fn decide(&mut self, view: &PlayerView) -> Option<Move> {
        moves::random_move(&Snapshot::of_view(view), &mut self.rng)
    }
}
