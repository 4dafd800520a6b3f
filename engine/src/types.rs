// ═══════════════════════════════════════════════════════════════════════
// Core types — cards, players, provinces and the game record
// ═══════════════════════════════════════════════════════════════════════

use crate::config::GameConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Identifiers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u32);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player ids are allocated per game, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Enums ──────────────────────────────────────────────────────────────

/// The five card colors. A color is also the name of a territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Yellow,
    Red,
    Purple,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Yellow,
        Color::Red,
        Color::Purple,
        Color::Green,
        Color::Blue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Purple => "purple",
            Color::Green => "green",
            Color::Blue => "blue",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown color '{}'", s))
    }
}

/// A card in the deck or in a hand. Serialized as a bare string
/// (`"red"`, `"ninja"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Card {
    Color(Color),
    Ninja,
}

impl Card {
    pub fn color(self) -> Option<Color> {
        match self {
            Card::Color(c) => Some(c),
            Card::Ninja => None,
        }
    }

    pub fn is_ninja(self) -> bool {
        self == Card::Ninja
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Card::Color(c) => write!(f, "{}", c),
            Card::Ninja => f.write_str("ninja"),
        }
    }
}

impl FromStr for Card {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "ninja" {
            Ok(Card::Ninja)
        } else {
            s.parse().map(Card::Color).map_err(|_| format!("unknown card '{}'", s))
        }
    }
}

impl From<Card> for String {
    fn from(card: Card) -> String {
        card.to_string()
    }
}

impl TryFrom<String> for Card {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for Card {
    fn from(c: Color) -> Card {
        Card::Color(c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Setup,
    Started,
    Ended,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Setup => f.write_str("setup"),
            GameStatus::Started => f.write_str("started"),
            GameStatus::Ended => f.write_str("ended"),
        }
    }
}

// ── Province ───────────────────────────────────────────────────────────

/// Cards deployed into one player's territory, counted per color.
///
/// A color stays recorded once it has been touched, even when its count
/// drops to zero or below; `has_recorded` reports that, `count` reads a
/// missing color as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Province {
    counts: BTreeMap<Color, i32>,
}

impl Province {
    pub fn count(&self, color: Color) -> i32 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    pub fn has_recorded(&self, color: Color) -> bool {
        self.counts.contains_key(&color)
    }

    pub fn adjust(&mut self, color: Color, delta: i32) {
        *self.counts.entry(color).or_insert(0) += delta;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, i32)> + '_ {
        self.counts.iter().map(|(&c, &n)| (c, n))
    }

    pub fn total(&self) -> i64 {
        self.counts.values().map(|&n| n as i64).sum()
    }
}

impl FromIterator<(Color, i32)> for Province {
    fn from_iter<I: IntoIterator<Item = (Color, i32)>>(iter: I) -> Self {
        Province { counts: iter.into_iter().collect() }
    }
}

// ── Player ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub name: String,
    /// Assigned at start, never changed afterwards.
    pub color: Option<Color>,
    pub hand: Vec<Card>,
    pub province: Province,
}

impl PlayerState {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        PlayerState {
            id,
            name: name.into(),
            color: None,
            hand: Vec::new(),
            province: Province::default(),
        }
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    /// Removes one copy of `card`. Returns false if the hand had none.
    pub fn take_card(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|&c| c == card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// The player's holdings of their own assigned color.
    pub fn own_color_count(&self) -> i32 {
        self.color.map_or(0, |c| self.province.count(c))
    }
}

// ── Game State ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub id: GameId,
    pub name: String,
    pub status: GameStatus,
    pub config: GameConfig,

    /// Players in turn order. Order is fixed at join time.
    pub players: Vec<PlayerState>,
    /// Whose move it is (only meaningful once started).
    pub current: Option<PlayerId>,
    /// Player whose move emptied the deck. Set at most once.
    pub last_mover: Option<PlayerId>,

    /// Shared deck, drawn from the front.
    pub deck: Vec<Card>,

    /// Filled in when the game ends. Ties produce several winners.
    pub winners: Vec<PlayerId>,

    // Deterministic RNG for shuffling, color assignment and first mover
    pub seed: u64,

    pub next_player_id: u32,
    pub moves_played: u32,
}

impl GameState {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Display name for messages; falls back to the raw id.
    pub fn player_name(&self, id: PlayerId) -> String {
        self.player(id)
            .map_or_else(|| format!("player {}", id), |p| p.name.clone())
    }

    pub fn player_with_color(&self, color: Color) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.color == Some(color))
    }

    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Ended
    }

    /// Cards still in play: deck + every hand + every province count.
    pub fn cards_in_play(&self) -> i64 {
        let hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        let provinces: i64 = self.players.iter().map(|p| p.province.total()).sum();
        self.deck.len() as i64 + hands as i64 + provinces
    }
}
