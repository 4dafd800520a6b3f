// ═══════════════════════════════════════════════════════════════════════
// Agent Trait — interface that all AI agents must implement
//
// KEY DESIGN PRINCIPLE:
//   Agents receive a `PlayerView` (not raw GameState), which only
//   contains information the player is legally allowed to see.
//
//   The agent never gets to see:
//     - Other players' hands
//     - Deck ordering
// ═══════════════════════════════════════════════════════════════════════

use shinobi_engine::orders::Move;
use shinobi_engine::types::PlayerId;
use shinobi_engine::visibility::PlayerView;

pub trait Agent: Send + Sync {
    /// Human-readable name for this agent (e.g., "Random", "Heuristic").
    fn name(&self) -> &str;

    /// The seat this agent is playing.
    fn player(&self) -> PlayerId;

    /// Picks a full three-slot move for the current turn. `None` means
    /// the agent found no legal move.
    fn decide(&mut self, view: &PlayerView) -> Option<Move>;
}
