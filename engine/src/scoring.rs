// ═══════════════════════════════════════════════════════════════════════
// Win determination
//
//   1. total every color across all provinces
//   2. only colors assigned to a player and recorded somewhere count;
//      if no assigned color was ever recorded, all assigned colors do
//   3. the player(s) whose color has the highest total lead
//   4. leaders are split by how many of their own color sit in their
//      own province; a second tie means shared victory
// ═══════════════════════════════════════════════════════════════════════

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final (or running) score line for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub player: PlayerId,
    pub name: String,
    pub color: Option<Color>,
    /// The player's color summed over every province.
    pub color_total: i32,
    /// The player's color in their own province (tie-break).
    pub own_color_count: i32,
}

/// Every recorded color summed over all provinces, wherever the cards sit.
pub fn color_totals(state: &GameState) -> BTreeMap<Color, i32> {
    let mut totals = BTreeMap::new();
    for p in &state.players {
        for (color, n) in p.province.iter() {
            *totals.entry(color).or_insert(0) += n;
        }
    }
    totals
}

pub fn standings(state: &GameState) -> Vec<Standing> {
    let totals = color_totals(state);
    state
        .players
        .iter()
        .map(|p| Standing {
            player: p.id,
            name: p.name.clone(),
            color: p.color,
            color_total: p.color.and_then(|c| totals.get(&c).copied()).unwrap_or(0),
            own_color_count: p.own_color_count(),
        })
        .collect()
}

/// Winners in turn order. Players without a color cannot win.
pub fn find_winners(state: &GameState) -> Vec<PlayerId> {
    let totals = color_totals(state);
    let assigned: Vec<Standing> = standings(state)
        .into_iter()
        .filter(|s| s.color.is_some())
        .collect();
    let recorded = |s: &Standing| s.color.is_some_and(|c| totals.contains_key(&c));
    let standings: Vec<Standing> = if assigned.iter().any(recorded) {
        assigned.into_iter().filter(recorded).collect()
    } else {
        assigned
    };

    let leaders = best(standings.iter().map(|s| (s, s.color_total)));
    if leaders.len() <= 1 {
        return leaders.iter().map(|s| s.player).collect();
    }
    best(leaders.into_iter().map(|s| (s, s.own_color_count)))
        .iter()
        .map(|s| s.player)
        .collect()
}

/// All entries sharing the maximum score.
fn best<T: Copy>(scores: impl IntoIterator<Item = (T, i32)>) -> Vec<T> {
    let scores: Vec<(T, i32)> = scores.into_iter().collect();
    let Some(max) = scores.iter().map(|&(_, s)| s).max() else {
        return Vec::new();
    };
    scores
        .into_iter()
        .filter(|&(_, s)| s == max)
        .map(|(t, _)| t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_keeps_ties() {
        assert_eq!(best([('a', 1), ('b', 3), ('c', 3)]), vec!['b', 'c']);
        assert!(best(Vec::<(char, i32)>::new()).is_empty());
    }
}
