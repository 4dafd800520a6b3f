// ═══════════════════════════════════════════════════════════════════════
// Errors for lifecycle and registry operations.
// Rule violations in a submitted move are not errors; they come back as
// a `Validation` value and only become `Rejected` at the registry edge.
// ═══════════════════════════════════════════════════════════════════════

use crate::config::ConfigError;
use crate::types::{Card, GameId, GameStatus, PlayerId};
use crate::validation::Validation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("game {0} not found")]
    GameNotFound(GameId),

    #[error("player {player} is not in game {game}")]
    PlayerNotFound { game: GameId, player: PlayerId },

    #[error("game {game} is {actual}, expected {expected}")]
    WrongStatus {
        game: GameId,
        expected: GameStatus,
        actual: GameStatus,
    },

    #[error("game {game} is full ({max} players)")]
    GameFull { game: GameId, max: usize },

    #[error("game {game} needs {min}-{max} players to start, has {count}")]
    PlayerCount {
        game: GameId,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("player {player} does not hold a {card} card")]
    MissingCard { player: PlayerId, card: Card },

    #[error("it is not player {player}'s turn")]
    NotYourTurn { player: PlayerId },

    #[error("move rejected: {0}")]
    Rejected(Validation),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, GameError>;

impl GameError {
    pub(crate) fn expect_status(
        game: GameId,
        expected: GameStatus,
        actual: GameStatus,
    ) -> EngineResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(GameError::WrongStatus { game, expected, actual })
        }
    }
}
