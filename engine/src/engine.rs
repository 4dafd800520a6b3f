// ═══════════════════════════════════════════════════════════════════════
// Game Engine — move execution and turn progression
//
// The engine is a pure state machine over GameState. It never does I/O.
//
// Flow for one turn:
//   1. `play_move` validates the move against a Snapshot (no mutation)
//   2. `execute_move` applies the three orders to the real state
//   3. the actor's hand is refilled from the front of the deck
//   4. the turn passes on, or the game ends and winners are recorded
//
// Deck exhaustion: the player whose move empties the deck becomes the
// last mover. The game ends after that player's *next* move, so every
// player gets one more turn once the deck is gone.
// ═══════════════════════════════════════════════════════════════════════

use crate::error::{EngineResult, GameError};
use crate::events::GameEvent;
use crate::orders::{Move, Order};
use crate::scoring;
use crate::types::*;
use crate::validation::validate_move;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// What happened during one accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// One line per executed order, in slot order.
    pub log: Vec<String>,
    pub events: Vec<GameEvent>,
}

impl MoveReport {
    pub fn ended(&self) -> bool {
        self.events.contains(&GameEvent::State(GameStatus::Ended))
    }
}

/// Validates and, if legal, executes `mv` for `actor`.
///
/// Turn ownership is the caller's concern; this only requires a started
/// game.
pub fn play_move(state: &mut GameState, actor: PlayerId, mv: &Move) -> EngineResult<MoveReport> {
    GameError::expect_status(state.id, GameStatus::Started, state.status)?;
    let validation = validate_move(state, actor, mv);
    if !validation.valid {
        warn!("game {}: rejected move from {}: {}", state.id, actor, validation);
        return Err(GameError::Rejected(validation));
    }
    execute_move(state, actor, mv)
}

/// Applies an already-validated move.
///
/// Every referenced player and every card the move spends are checked
/// before anything changes, so a failure leaves the state untouched.
pub fn execute_move(state: &mut GameState, actor: PlayerId, mv: &Move) -> EngineResult<MoveReport> {
    let referenced = std::iter::once(actor)
        .chain(mv.slots().into_iter().flat_map(|(_, o)| o.map(Order::players).unwrap_or_default()));
    for player in referenced {
        if state.player(player).is_none() {
            return Err(GameError::PlayerNotFound { game: state.id, player });
        }
    }
    check_hand(state, actor, mv)?;

    let mut log = Vec::with_capacity(3);
    for (_, order) in mv.slots() {
        if let Some(order) = order {
            log.push(apply_order(state, actor, order)?);
        }
    }
    draw_cards(state, actor)?;
    state.moves_played += 1;

    let mut events = Vec::new();
    finish_turn(state, actor, &mut events);
    Ok(MoveReport { log, events })
}

// Deploys and ninjas each spend one card, in slot order.
fn check_hand(state: &GameState, actor: PlayerId, mv: &Move) -> EngineResult<()> {
    let mut hand = state
        .player(actor)
        .map(|p| p.hand.clone())
        .unwrap_or_default();
    for (_, order) in mv.slots() {
        let card = match order {
            Some(&Order::Deploy { color, .. }) => Card::Color(color),
            Some(Order::Ninja { .. }) => Card::Ninja,
            _ => continue,
        };
        match hand.iter().position(|&c| c == card) {
            Some(pos) => {
                hand.remove(pos);
            }
            None => return Err(GameError::MissingCard { player: actor, card }),
        }
    }
    Ok(())
}

fn apply_order(state: &mut GameState, actor: PlayerId, order: &Order) -> EngineResult<String> {
    let game = state.id;
    let missing = |player| GameError::PlayerNotFound { game, player };

    let line = match *order {
        Order::Deploy { color, to } => {
            state.player_mut(actor).ok_or(missing(actor))?.take_card(Card::Color(color));
            state.player_mut(to).ok_or(missing(to))?.province.adjust(color, 1);
            format!("deployed {} to {}", color, state.player_name(to))
        }
        Order::Ninja { color, to } => {
            state.player_mut(actor).ok_or(missing(actor))?.take_card(Card::Ninja);
            state.player_mut(to).ok_or(missing(to))?.province.adjust(color, -1);
            format!("killed {} in {}'s province", color, state.player_name(to))
        }
        Order::Transfer { color, from, to } => {
            state.player_mut(from).ok_or(missing(from))?.province.adjust(color, -1);
            state.player_mut(to).ok_or(missing(to))?.province.adjust(color, 1);
            format!(
                "transferred {} from {} to {}",
                color,
                state.player_name(from),
                state.player_name(to)
            )
        }
        Order::Attack { color, to } => {
            state.player_mut(to).ok_or(missing(to))?.province.adjust(color, -1);
            format!("attacked {} in {}'s province", color, state.player_name(to))
        }
    };
    Ok(line)
}

/// Refills `player`'s hand from the front of the deck, stopping early if
/// the deck runs out. Returns how many cards were drawn.
pub fn draw_cards(state: &mut GameState, player: PlayerId) -> EngineResult<usize> {
    let hand_size = state.config.hand_size;
    let held = state
        .player(player)
        .ok_or(GameError::PlayerNotFound { game: state.id, player })?
        .hand
        .len();
    let n = hand_size.saturating_sub(held).min(state.deck.len());
    let drawn: Vec<Card> = state.deck.drain(..n).collect();
    if let Some(p) = state.player_mut(player) {
        p.hand.extend(drawn);
    }
    Ok(n)
}

/// Next player in turn order, wrapping around. A `current` that is not
/// in the order restarts from the front.
pub fn next_player(order: &[PlayerId], current: PlayerId) -> Option<PlayerId> {
    match order.iter().position(|&p| p == current) {
        Some(i) => order.get((i + 1) % order.len()).copied(),
        None => order.first().copied(),
    }
}

// The marker is read before it is written and the comparison uses the old
// value; this is what delays the end by one full revolution.
fn finish_turn(state: &mut GameState, actor: PlayerId, events: &mut Vec<GameEvent>) {
    let last_mover = state.last_mover;
    if last_mover.is_none() && state.deck.is_empty() {
        info!("game {}: deck exhausted by player {}", state.id, actor);
        state.last_mover = Some(actor);
    }

    if last_mover == Some(actor) {
        end_game(state, events);
    } else {
        advance_turn(state, events);
    }
}

fn advance_turn(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let order = state.player_ids();
    let next = match state.current {
        Some(current) => next_player(&order, current),
        None => order.first().copied(),
    };
    state.current = next;
    if let Some(next) = next {
        events.push(GameEvent::CurrentPlayer(next));
    }
}

/// Scores the game, records the winners and moves to `ended`.
pub fn end_game(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.winners = scoring::find_winners(state);
    state.status = GameStatus::Ended;
    info!(
        "game {} ended after {} moves, winners {:?}",
        state.id, state.moves_played, state.winners
    );
    events.push(GameEvent::State(GameStatus::Ended));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_player_wraps() {
        let order = [PlayerId(4), PlayerId(1), PlayerId(7)];
        assert_eq!(next_player(&order, PlayerId(4)), Some(PlayerId(1)));
        assert_eq!(next_player(&order, PlayerId(7)), Some(PlayerId(4)));
        assert_eq!(next_player(&order, PlayerId(9)), Some(PlayerId(4)));
        assert_eq!(next_player(&[], PlayerId(1)), None);
    }
}
