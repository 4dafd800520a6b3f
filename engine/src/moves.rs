// ═══════════════════════════════════════════════════════════════════════
// Legal move enumeration.
// Each slot's options are checked against the snapshot left behind by
// the earlier slots, so a first choice constrains what follows.
// ═══════════════════════════════════════════════════════════════════════

use crate::orders::{Move, Order, Slot};
use crate::types::*;
use crate::validation::Snapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

fn hand_colors(snap: &Snapshot) -> BTreeSet<Color> {
    snap.hand().iter().filter_map(|c| c.color()).collect()
}

fn legal(snap: &Snapshot, slot: Slot, candidates: Vec<Order>) -> Vec<Order> {
    candidates
        .into_iter()
        .filter(|o| snap.clone().apply(slot, Some(o)).is_ok())
        .collect()
}

/// Legal first orders: deploys to opponents, ninjas on any recorded stack.
pub fn first_options(snap: &Snapshot) -> Vec<Order> {
    let mut candidates = Vec::new();
    for color in hand_colors(snap) {
        for to in snap.opponents() {
            candidates.push(Order::Deploy { color, to });
        }
    }
    if snap.hand().contains(&Card::Ninja) {
        for &to in snap.players() {
            if let Some(province) = snap.province(to) {
                for (color, _) in province.iter() {
                    candidates.push(Order::Ninja { color, to });
                }
            }
        }
    }
    legal(snap, Slot::First, candidates)
}

/// Legal second orders, given a snapshot that already has the first
/// order applied.
pub fn second_options(snap: &Snapshot) -> Vec<Order> {
    let me = snap.actor();
    let mut candidates: Vec<Order> = hand_colors(snap)
        .into_iter()
        .map(|color| Order::Deploy { color, to: me })
        .collect();
    for from in snap.opponents() {
        let Some(province) = snap.province(from) else { continue };
        for (color, n) in province.iter() {
            if n <= 0 {
                continue;
            }
            for &to in snap.players() {
                if to != from {
                    candidates.push(Order::Transfer { color, from, to });
                }
            }
        }
    }
    legal(snap, Slot::Second, candidates)
}

/// Legal third slot entries. Declining is only offered when no attack is
/// possible.
pub fn third_options(snap: &Snapshot) -> Vec<Option<Order>> {
    let attacks = snap.legal_attacks();
    if attacks.is_empty() {
        vec![None]
    } else {
        attacks
            .into_iter()
            .map(|(to, color)| Some(Order::Attack { color, to }))
            .collect()
    }
}

/// A uniformly chosen order per slot, backtracking over first orders
/// that leave no legal second order. `None` if the player is stuck.
pub fn random_move(snap: &Snapshot, rng: &mut impl Rng) -> Option<Move> {
    let mut firsts = first_options(snap);
    firsts.shuffle(rng);
    for first in firsts {
        let mut after_first = snap.clone();
        if after_first.apply(Slot::First, Some(&first)).is_err() {
            continue;
        }
        let Some(&second) = second_options(&after_first).choose(rng) else {
            continue;
        };
        let mut after_second = after_first;
        if after_second.apply(Slot::Second, Some(&second)).is_err() {
            continue;
        }
        let third = *third_options(&after_second).choose(rng)?;
        return Some(Move::new(first, second, third));
    }
    None
}

/// The first legal move in enumeration order, if any.
pub fn any_legal_move(snap: &Snapshot) -> Option<Move> {
    for first in first_options(snap) {
        let mut after_first = snap.clone();
        after_first.apply(Slot::First, Some(&first)).ok()?;
        if let Some(&second) = second_options(&after_first).first() {
            let mut after_second = after_first;
            after_second.apply(Slot::Second, Some(&second)).ok()?;
            let third = *third_options(&after_second).first()?;
            return Some(Move::new(first, second, third));
        }
    }
    None
}
