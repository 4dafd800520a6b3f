// ═══════════════════════════════════════════════════════════════════════
// Game setup — creation, joining/leaving, and the start transition
// ═══════════════════════════════════════════════════════════════════════

use crate::cards::{self, PALETTE};
use crate::config::GameConfig;
use crate::engine::draw_cards;
use crate::error::{EngineResult, GameError};
use crate::events::{GameEvent, RosterAction};
use crate::types::*;
use log::info;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A new game in `setup`, with no players and an empty deck.
/// Seed controls deck shuffling, color assignment and the first mover.
pub fn create_game(id: GameId, name: impl Into<String>, seed: u64, config: GameConfig) -> GameState {
    GameState {
        id,
        name: name.into(),
        status: GameStatus::Setup,
        config,
        players: Vec::new(),
        current: None,
        last_mover: None,
        deck: Vec::new(),
        winners: Vec::new(),
        seed,
        next_player_id: 1,
        moves_played: 0,
    }
}

/// Appends a player to the turn order.
pub fn add_player(state: &mut GameState, name: impl Into<String>) -> EngineResult<(PlayerId, GameEvent)> {
    GameError::expect_status(state.id, GameStatus::Setup, state.status)?;
    if state.player_count() >= state.config.max_players {
        return Err(GameError::GameFull { game: state.id, max: state.config.max_players });
    }

    let id = PlayerId(state.next_player_id);
    state.next_player_id += 1;
    state.players.push(PlayerState::new(id, name));
    info!("game {}: player {} joined", state.id, id);
    Ok((id, GameEvent::Players { action: RosterAction::Join, player: id }))
}

/// Removes a player before the game starts.
pub fn remove_player(state: &mut GameState, player: PlayerId) -> EngineResult<GameEvent> {
    GameError::expect_status(state.id, GameStatus::Setup, state.status)?;
    let before = state.player_count();
    state.players.retain(|p| p.id != player);
    if state.player_count() == before {
        return Err(GameError::PlayerNotFound { game: state.id, player });
    }
    info!("game {}: player {} left", state.id, player);
    Ok(GameEvent::Players { action: RosterAction::Leave, player })
}

/// Shuffles the deck, hands out colors, deals opening hands and picks
/// a random first mover.
pub fn start_game(state: &mut GameState) -> EngineResult<Vec<GameEvent>> {
    GameError::expect_status(state.id, GameStatus::Setup, state.status)?;
    let count = state.player_count();
    let (min, max) = (state.config.min_players, state.config.max_players);
    if count < min || count > max {
        return Err(GameError::PlayerCount { game: state.id, count, min, max });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(state.seed);
    state.deck = cards::shuffled_deck(&state.config, &mut rng);

    let mut colors = PALETTE.to_vec();
    colors.shuffle(&mut rng);
    for id in state.player_ids() {
        if let Some(p) = state.player_mut(id) {
            p.color = colors.pop();
        }
        draw_cards(state, id)?;
    }

    state.current = state.player_ids().choose(&mut rng).copied();
    state.status = GameStatus::Started;
    info!(
        "game {} started: {} players, first mover {:?}",
        state.id, count, state.current
    );
    Ok(vec![GameEvent::State(GameStatus::Started)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn lobby(players: usize, seed: u64) -> GameState {
        let mut state = create_game(GameId(1), "lobby", seed, GameConfig::default());
        for i in 0..players {
            add_player(&mut state, format!("p{}", i)).unwrap();
        }
        state
    }

    #[test]
    fn test_start_deals_and_assigns() {
        let mut state = lobby(4, 42);
        let events = start_game(&mut state).unwrap();
        assert_eq!(events, vec![GameEvent::State(GameStatus::Started)]);
        assert_eq!(state.status, GameStatus::Started);
        assert_eq!(state.deck.len(), 58 - 16);

        let colors: HashSet<Color> = state.players.iter().filter_map(|p| p.color).collect();
        assert_eq!(colors.len(), 4);
        for p in &state.players {
            assert_eq!(p.hand.len(), 4);
            assert_eq!(p.province, Province::default());
        }
        assert!(state.current.is_some_and(|c| state.player(c).is_some()));
    }

    #[test]
    fn test_start_requires_player_count() {
        let mut state = lobby(2, 1);
        assert!(matches!(
            start_game(&mut state),
            Err(GameError::PlayerCount { count: 2, min: 3, max: 5, .. })
        ));
        assert_eq!(state.status, GameStatus::Setup);
    }

    #[test]
    fn test_sixth_player_cannot_join() {
        let mut state = lobby(5, 1);
        assert!(matches!(add_player(&mut state, "late"), Err(GameError::GameFull { max: 5, .. })));
    }

    #[test]
    fn test_no_joining_after_start() {
        let mut state = lobby(3, 1);
        start_game(&mut state).unwrap();
        assert!(matches!(add_player(&mut state, "late"), Err(GameError::WrongStatus { .. })));
        assert!(matches!(start_game(&mut state), Err(GameError::WrongStatus { .. })));
    }

    #[test]
    fn test_leave_during_setup() {
        let mut state = lobby(3, 1);
        let event = remove_player(&mut state, PlayerId(2)).unwrap();
        assert_eq!(event, GameEvent::Players { action: RosterAction::Leave, player: PlayerId(2) });
        assert_eq!(state.player_ids(), vec![PlayerId(1), PlayerId(3)]);
        assert!(remove_player(&mut state, PlayerId(2)).is_err());
        // Ids are never reused.
        let (id, _) = add_player(&mut state, "again").unwrap();
        assert_eq!(id, PlayerId(4));
    }

    #[test]
    fn test_deterministic_seed() {
        let mut s1 = lobby(5, 123);
        let mut s2 = lobby(5, 123);
        start_game(&mut s1).unwrap();
        start_game(&mut s2).unwrap();
        assert_eq!(s1.deck, s2.deck);
        assert_eq!(s1.current, s2.current);
        for (a, b) in s1.players.iter().zip(&s2.players) {
            assert_eq!(a.color, b.color);
            assert_eq!(a.hand, b.hand);
        }
    }
}
