// ═══════════════════════════════════════════════════════════════════════
// Visibility / Information Model
//
//   PUBLIC  — provinces, assigned colors, hand sizes, deck size, turn
//             order, current mover, deck-exhaustion marker, winners
//   PRIVATE — the viewer's own hand
//   HIDDEN  — deck order and every other player's hand
//
// Agents only ever receive a PlayerView, never the raw GameState.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub game: GameId,
    pub viewer: PlayerId,
    pub status: GameStatus,
    pub current: Option<PlayerId>,
    pub last_mover: Option<PlayerId>,
    pub deck_size: usize,
    pub moves_played: u32,

    /// Every player in turn order, viewer included.
    pub players: Vec<PublicPlayerInfo>,

    pub my_color: Option<Color>,
    pub my_hand: Vec<Card>,

    pub winners: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicPlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub color: Option<Color>,
    pub cards_in_hand: usize,
    pub province: Province,
}

impl PlayerView {
    pub fn player(&self, id: PlayerId) -> Option<&PublicPlayerInfo> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_my_turn(&self) -> bool {
        self.status == GameStatus::Started && self.current == Some(self.viewer)
    }

    /// Colors actually in play; unassigned colors can never win.
    pub fn assigned_colors(&self) -> Vec<Color> {
        self.players.iter().filter_map(|p| p.color).collect()
    }

    /// Sum of `color` over every province.
    pub fn color_total(&self, color: Color) -> i32 {
        self.players.iter().map(|p| p.province.count(color)).sum()
    }
}

pub fn player_view(state: &GameState, viewer: PlayerId) -> PlayerView {
    let me = state.player(viewer);
    PlayerView {
        game: state.id,
        viewer,
        status: state.status,
        current: state.current,
        last_mover: state.last_mover,
        deck_size: state.deck.len(),
        moves_played: state.moves_played,
        players: state
            .players
            .iter()
            .map(|p| PublicPlayerInfo {
                id: p.id,
                name: p.name.clone(),
                color: p.color,
                cards_in_hand: p.hand.len(),
                province: p.province.clone(),
            })
            .collect(),
        my_color: me.and_then(|p| p.color),
        my_hand: me.map(|p| p.hand.clone()).unwrap_or_default(),
        winners: state.winners.clone(),
    }
}
