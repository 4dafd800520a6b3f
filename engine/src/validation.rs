// ═══════════════════════════════════════════════════════════════════════
// Move validation
//
// Validation never touches the live GameState. It works on a Snapshot:
// a value copy of the acting player's hand and of every province, which
// each slot mutates in turn so later slots see earlier effects:
//
//   first  — Deploy to another player (marks target/color dirty) or Ninja
//   second — Deploy to self, or Transfer between non-acting provinces
//   third  — Attack if legal; declining is only allowed when no attack is
//
// A province/color dirtied by this move's first deploy cannot be
// attacked by the same move.
// ═══════════════════════════════════════════════════════════════════════

use crate::orders::{Move, Order, Slot};
use crate::types::*;
use crate::visibility::PlayerView;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Outcome of validating a move.
///
/// Slot rejections always carry exactly three messages in slot order,
/// blank for slots that passed. An incomplete move carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub messages: Vec<String>,
}

impl Validation {
    pub fn incomplete() -> Self {
        Validation {
            valid: false,
            messages: vec!["Incomplete move".to_string()],
        }
    }

    pub fn from_slots(results: [Result<(), String>; 3]) -> Self {
        let valid = results.iter().all(Result::is_ok);
        let messages = results
            .into_iter()
            .map(|r| r.err().unwrap_or_default())
            .collect();
        Validation { valid, messages }
    }

    /// Non-blank messages, for logs and error text.
    pub fn problems(&self) -> Vec<&str> {
        self.messages
            .iter()
            .map(String::as_str)
            .filter(|m| !m.is_empty())
            .collect()
    }
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            f.write_str("valid")
        } else {
            f.write_str(&self.problems().join("; "))
        }
    }
}

// ── Snapshot ───────────────────────────────────────────────────────────

/// Tentative copy of everything a move can touch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    actor: PlayerId,
    /// Turn order, used to enumerate opponents.
    order: Vec<PlayerId>,
    names: BTreeMap<PlayerId, String>,
    hand: Vec<Card>,
    provinces: BTreeMap<PlayerId, Province>,
    dirty: BTreeSet<(PlayerId, Color)>,
}

impl Snapshot {
    pub fn of_state(state: &GameState, actor: PlayerId) -> Self {
        Snapshot {
            actor,
            order: state.player_ids(),
            names: state.players.iter().map(|p| (p.id, p.name.clone())).collect(),
            hand: state.player(actor).map(|p| p.hand.clone()).unwrap_or_default(),
            provinces: state.players.iter().map(|p| (p.id, p.province.clone())).collect(),
            dirty: BTreeSet::new(),
        }
    }

    /// Built from what the viewer can see, so agents can validate
    /// candidate moves without the hidden parts of the state.
    pub fn of_view(view: &PlayerView) -> Self {
        Snapshot {
            actor: view.viewer,
            order: view.players.iter().map(|p| p.id).collect(),
            names: view.players.iter().map(|p| (p.id, p.name.clone())).collect(),
            hand: view.my_hand.clone(),
            provinces: view.players.iter().map(|p| (p.id, p.province.clone())).collect(),
            dirty: BTreeSet::new(),
        }
    }

    pub fn actor(&self) -> PlayerId {
        self.actor
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn opponents(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.order.iter().copied().filter(move |&p| p != self.actor)
    }

    pub fn province(&self, player: PlayerId) -> Option<&Province> {
        self.provinces.get(&player)
    }

    /// Tentative count; unknown players and unrecorded colors read as zero.
    pub fn count(&self, player: PlayerId, color: Color) -> i32 {
        self.provinces.get(&player).map_or(0, |p| p.count(color))
    }

    pub fn is_dirty(&self, player: PlayerId, color: Color) -> bool {
        self.dirty.contains(&(player, color))
    }

    /// Validates a full move on a throwaway copy of this snapshot.
    pub fn validate(&self, mv: &Move) -> Validation {
        let mut tentative = self.clone();
        let results = [
            tentative.apply(Slot::First, Some(&mv.first)),
            tentative.apply(Slot::Second, Some(&mv.second)),
            tentative.apply(Slot::Third, mv.third.as_ref()),
        ];
        let validation = Validation::from_slots(results);
        debug!("player {} move {:?}: {}", self.actor, mv, validation);
        validation
    }

    /// Checks one slot and, on success, applies its tentative effect.
    /// Slots must be applied in order for the result to mean anything.
    pub fn apply(&mut self, slot: Slot, order: Option<&Order>) -> Result<(), String> {
        match (slot, order) {
            (Slot::First, Some(&Order::Deploy { color, to })) => self.first_deploy(color, to),
            (Slot::First, Some(&Order::Ninja { color, to })) => self.ninja(color, to),
            (Slot::Second, Some(&Order::Deploy { color, to })) => self.second_deploy(color, to),
            (Slot::Second, Some(&Order::Transfer { color, from, to })) => {
                self.transfer(color, from, to)
            }
            (Slot::Third, Some(&Order::Attack { color, to })) => self.attack(color, to),
            (Slot::Third, None) => self.no_attack(),
            (slot, _) => Err(format!("Wrong type for {} order", slot)),
        }
    }

    /// Whether the actor could attack `color` in `target`'s province:
    /// not dirtied this move, and out-stacked by some other color in the
    /// actor's own province.
    pub fn can_attack(&self, target: PlayerId, color: Color) -> bool {
        if self.is_dirty(target, color) {
            return false;
        }
        let enemy_count = self.count(target, color);
        self.provinces.get(&self.actor).is_some_and(|own| {
            own.iter().any(|(c, n)| c != color && n > enemy_count)
        })
    }

    /// Every (opponent, color) stack with a positive count that the actor
    /// may attack right now.
    pub fn legal_attacks(&self) -> Vec<(PlayerId, Color)> {
        self.enemy_stacks()
            .into_iter()
            .filter(|&(p, c)| self.can_attack(p, c))
            .collect()
    }

    fn enemy_stacks(&self) -> Vec<(PlayerId, Color)> {
        self.opponents()
            .filter_map(|p| self.provinces.get(&p).map(|prov| (p, prov)))
            .flat_map(|(p, prov)| {
                prov.iter()
                    .filter(|&(_, n)| n > 0)
                    .map(move |(c, _)| (p, c))
            })
            .collect()
    }

    fn name(&self, player: PlayerId) -> String {
        self.names
            .get(&player)
            .cloned()
            .unwrap_or_else(|| format!("player {}", player))
    }

    fn known(&self, player: PlayerId) -> Result<(), String> {
        if self.provinces.contains_key(&player) {
            Ok(())
        } else {
            Err(format!("Unknown player {}", player))
        }
    }

    fn take(&mut self, card: Card) -> bool {
        match self.hand.iter().position(|&c| c == card) {
            Some(pos) => {
                self.hand.remove(pos);
                true
            }
            None => false,
        }
    }

    fn adjust(&mut self, player: PlayerId, color: Color, delta: i32) {
        self.provinces.entry(player).or_default().adjust(color, delta);
    }

    // ── Per-slot rules ─────────────────────────────────────────────────

    fn first_deploy(&mut self, color: Color, to: PlayerId) -> Result<(), String> {
        if !self.hand.contains(&Card::Color(color)) {
            return Err(format!("You do not have a {} card to deploy", color));
        }
        if to == self.actor {
            return Err("You cannot deploy to your own province in the first order".into());
        }
        self.known(to)?;
        self.take(Card::Color(color));
        self.adjust(to, color, 1);
        self.dirty.insert((to, color));
        Ok(())
    }

    fn second_deploy(&mut self, color: Color, to: PlayerId) -> Result<(), String> {
        if !self.hand.contains(&Card::Color(color)) {
            return Err(format!("You do not have a {} card to deploy", color));
        }
        if to != self.actor {
            return Err("You cannot deploy to an enemy's province in the second order".into());
        }
        self.take(Card::Color(color));
        self.adjust(to, color, 1);
        Ok(())
    }

    // Key presence, not a positive count: a color driven to zero or below
    // can still be targeted.
    fn ninja(&mut self, color: Color, to: PlayerId) -> Result<(), String> {
        if !self.hand.contains(&Card::Ninja) {
            return Err("You do not have a ninja card".into());
        }
        self.known(to)?;
        if !self.provinces[&to].has_recorded(color) {
            return Err(format!("{} does not have a {} card", self.name(to), color));
        }
        self.take(Card::Ninja);
        self.adjust(to, color, -1);
        Ok(())
    }

    fn transfer(&mut self, color: Color, from: PlayerId, to: PlayerId) -> Result<(), String> {
        if from == self.actor {
            return Err("You cannot transfer from your own province".into());
        }
        self.known(from)?;
        self.known(to)?;
        if self.count(from, color) <= 0 {
            return Err(format!("{} does not have a {} card", self.name(from), color));
        }
        self.adjust(from, color, -1);
        self.adjust(to, color, 1);
        Ok(())
    }

    fn attack(&self, color: Color, to: PlayerId) -> Result<(), String> {
        if to == self.actor {
            return Err("You cannot attack your own province".into());
        }
        self.known(to)?;
        if self.can_attack(to, color) {
            Ok(())
        } else {
            Err(format!("You cannot attack {} {}", self.name(to), color))
        }
    }

    fn no_attack(&self) -> Result<(), String> {
        if self.legal_attacks().is_empty() {
            Ok(())
        } else {
            Err("You must attack if you can".into())
        }
    }
}

/// Validates `mv` for `actor` against the current state without
/// changing it.
pub fn validate_move(state: &GameState, actor: PlayerId, mv: &Move) -> Validation {
    Snapshot::of_state(state, actor).validate(mv)
}
