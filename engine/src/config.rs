// ═══════════════════════════════════════════════════════════════════════
// Game configuration
//
// The defaults are the standard rules: 11 cards of each color plus
// 3 ninjas, hands of 4, and 3–5 players. A JSON file may override any
// subset of the fields.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Hands are refilled up to this many cards after every move.
    pub hand_size: usize,
    /// Copies of each of the five colors in a fresh deck.
    pub copies_per_color: usize,
    /// Ninja cards in a fresh deck.
    pub ninja_cards: usize,
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            hand_size: 4,
            copies_per_color: 11,
            ninja_cards: 3,
            min_players: 3,
            max_players: 5,
        }
    }
}

impl GameConfig {
    pub fn deck_size(&self) -> usize {
        self.copies_per_color * Color::ALL.len() + self.ninja_cards
    }

    /// Every player needs a distinct color, so at most five can play.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_size == 0 {
            return Err(ConfigError::Invalid("hand_size must be at least 1".into()));
        }
        if self.min_players < 2 {
            return Err(ConfigError::Invalid("min_players must be at least 2".into()));
        }
        if self.max_players > Color::ALL.len() {
            return Err(ConfigError::Invalid(format!(
                "max_players cannot exceed {} (one color per player)",
                Color::ALL.len()
            )));
        }
        if self.min_players > self.max_players {
            return Err(ConfigError::Invalid(format!(
                "min_players ({}) is greater than max_players ({})",
                self.min_players, self.max_players
            )));
        }
        if self.deck_size() < self.hand_size * self.max_players {
            return Err(ConfigError::Invalid(format!(
                "a deck of {} cards cannot deal {} hands of {}",
                self.deck_size(),
                self.max_players,
                self.hand_size
            )));
        }
        Ok(())
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
