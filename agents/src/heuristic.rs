// ═══════════════════════════════════════════════════════════════════════
// Heuristic Agent — greedy, one slot at a time.
//
// Each slot picks the legal order that leaves the best margin between
// the agent's color total and the strongest rival color, with ties
// broken by how many of its own color sit at home. Ties after that are
// broken randomly.
// Significantly stronger than RandomAgent.
// ═══════════════════════════════════════════════════════════════════════

use crate::agent::Agent;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shinobi_engine::moves;
use shinobi_engine::orders::{Move, Order, Slot};
use shinobi_engine::types::*;
use shinobi_engine::validation::Snapshot;
use shinobi_engine::visibility::PlayerView;

pub struct HeuristicAgent {
    player: PlayerId,
    rng: ChaCha8Rng,
}

/// Colors that matter when judging a position.
struct Stakes {
    mine: Option<Color>,
    rivals: Vec<Color>,
}

impl HeuristicAgent {
    pub fn new(player: PlayerId, seed: u64) -> Self {
        HeuristicAgent {
            player,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Applies each candidate to a copy of `snap` and returns them best
    /// first, paired with the resulting snapshot.
    fn rank(
        &mut self,
        snap: &Snapshot,
        stakes: &Stakes,
        slot: Slot,
        candidates: Vec<Option<Order>>,
    ) -> Vec<(Option<Order>, Snapshot)> {
        let mut scored: Vec<(Option<Order>, Snapshot)> = candidates
            .into_iter()
            .filter_map(|order| {
                let mut next = snap.clone();
                next.apply(slot, order.as_ref()).ok()?;
                Some((order, next))
            })
            .collect();
        scored.shuffle(&mut self.rng);
        // Stable sort keeps the shuffled order among equals.
        scored.sort_by_key(|(_, s)| std::cmp::Reverse(evaluate(s, stakes)));
        scored
    }
}

/// (margin over the best rival color, own color at home)
fn evaluate(snap: &Snapshot, stakes: &Stakes) -> (i32, i32) {
    let Some(mine) = stakes.mine else {
        return (0, 0);
    };
    let total = |color: Color| -> i32 { snap.players().iter().map(|&p| snap.count(p, color)).sum() };
    let best_rival = stakes.rivals.iter().map(|&c| total(c)).max().unwrap_or(0);
    (total(mine) - best_rival, snap.count(snap.actor(), mine))
}

impl Agent for HeuristicAgent {
    fn name(&self) -> &str { "Heuristic" }
    fn player(&self) -> PlayerId { self.player }

    fn decide(&mut self, view: &PlayerView) -> Option<Move> {
        let snap = Snapshot::of_view(view);
        let stakes = Stakes {
            mine: view.my_color,
            rivals: view
                .players
                .iter()
                .filter(|p| p.id != view.viewer)
                .filter_map(|p| p.color)
                .collect(),
        };

        let firsts = moves::first_options(&snap).into_iter().map(Some).collect();
        for (first, after_first) in self.rank(&snap, &stakes, Slot::First, firsts) {
            let seconds = moves::second_options(&after_first).into_iter().map(Some).collect();
            let Some((second, after_second)) = self
                .rank(&after_first, &stakes, Slot::Second, seconds)
                .into_iter()
                .next()
            else {
                continue;
            };
            let thirds = moves::third_options(&after_second);
            let (third, _) = self
                .rank(&after_second, &stakes, Slot::Third, thirds)
                .into_iter()
                .next()?;
            return Some(Move::new(first?, second?, third));
        }
        None
    }
}
