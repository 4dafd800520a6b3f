// ═══════════════════════════════════════════════════════════════════════
// Deck construction
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use crate::types::{Card, Color};
use rand::seq::SliceRandom;
use rand::Rng;

/// Colors handed out to players at start, one each.
pub const PALETTE: [Color; 5] = Color::ALL;

/// The unshuffled deck: the palette repeated `copies_per_color` times,
/// followed by the ninjas.
pub fn fresh_deck(config: &GameConfig) -> Vec<Card> {
    let mut deck: Vec<Card> = (0..config.copies_per_color)
        .flat_map(|_| PALETTE.iter().map(|&c| Card::Color(c)))
        .collect();
    deck.extend(std::iter::repeat(Card::Ninja).take(config.ninja_cards));
    deck
}

pub fn shuffled_deck(config: &GameConfig, rng: &mut impl Rng) -> Vec<Card> {
    let mut deck = fresh_deck(config);
    deck.shuffle(rng);
    deck
}
