// ═══════════════════════════════════════════════════════════════════════
// Orders and moves
//
// A move is three order slots. The slot decides which order kinds are
// allowed:
//   first  — Deploy (to another player) or Ninja
//   second — Deploy (to self) or Transfer
//   third  — Attack, or nothing
//
// Wire shape (JSON):
//   { "first":  { "type": "deploy", "color": "red", "to": 2 },
//     "second": { "type": "transfer", "color": "blue", "from": 3, "to": 1 },
//     "third":  null }
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Color, PlayerId};
use crate::validation::Validation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Order {
    Deploy { color: Color, to: PlayerId },
    Ninja { color: Color, to: PlayerId },
    Transfer { color: Color, from: PlayerId, to: PlayerId },
    Attack { color: Color, to: PlayerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Deploy,
    Ninja,
    Transfer,
    Attack,
}

impl OrderKind {
    pub const ALL: [OrderKind; 4] = [
        OrderKind::Deploy,
        OrderKind::Ninja,
        OrderKind::Transfer,
        OrderKind::Attack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderKind::Deploy => "deploy",
            OrderKind::Ninja => "ninja",
            OrderKind::Transfer => "transfer",
            OrderKind::Attack => "attack",
        }
    }
}

impl Order {
    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Deploy { .. } => OrderKind::Deploy,
            Order::Ninja { .. } => OrderKind::Ninja,
            Order::Transfer { .. } => OrderKind::Transfer,
            Order::Attack { .. } => OrderKind::Attack,
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Order::Deploy { color, .. }
            | Order::Ninja { color, .. }
            | Order::Transfer { color, .. }
            | Order::Attack { color, .. } => color,
        }
    }

    /// The province that receives the order's effect.
    pub fn to(&self) -> PlayerId {
        match *self {
            Order::Deploy { to, .. }
            | Order::Ninja { to, .. }
            | Order::Transfer { to, .. }
            | Order::Attack { to, .. } => to,
        }
    }

    /// Every player id the order refers to.
    pub fn players(&self) -> Vec<PlayerId> {
        match *self {
            Order::Transfer { from, to, .. } => vec![from, to],
            other => vec![other.to()],
        }
    }
}

// ── Slots ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::First, Slot::Second, Slot::Third];

    pub fn as_str(self) -> &'static str {
        match self {
            Slot::First => "first",
            Slot::Second => "second",
            Slot::Third => "third",
        }
    }

    pub fn allows(self, kind: OrderKind) -> bool {
        matches!(
            (self, kind),
            (Slot::First, OrderKind::Deploy | OrderKind::Ninja)
                | (Slot::Second, OrderKind::Deploy | OrderKind::Transfer)
                | (Slot::Third, OrderKind::Attack)
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Move ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub first: Order,
    pub second: Order,
    /// `None` declines to attack.
    pub third: Option<Order>,
}

impl Move {
    pub fn new(first: Order, second: Order, third: Option<Order>) -> Self {
        Move { first, second, third }
    }

    /// Orders in slot order; the third entry is `None` when declined.
    pub fn slots(&self) -> [(Slot, Option<&Order>); 3] {
        [
            (Slot::First, Some(&self.first)),
            (Slot::Second, Some(&self.second)),
            (Slot::Third, self.third.as_ref()),
        ]
    }

    pub fn ninja_count(&self) -> usize {
        self.slots()
            .iter()
            .filter(|(_, o)| matches!(o, Some(Order::Ninja { .. })))
            .count()
    }
}

/// Parses an untrusted JSON move.
///
/// A missing slot rejects the whole move with a single `Incomplete move`
/// message. Slot-level problems (no `type`, an unknown `type`, bad fields)
/// come back as a three-message rejection with the other slots blank.
pub fn parse_move(value: &Value) -> Result<Move, Validation> {
    let Some(obj) = value.as_object() else {
        return Err(Validation::incomplete());
    };
    if Slot::ALL.iter().any(|s| !obj.contains_key(s.as_str())) {
        return Err(Validation::incomplete());
    }

    let first = parse_slot(Slot::First, &obj["first"]);
    let second = parse_slot(Slot::Second, &obj["second"]);
    let third = match &obj["third"] {
        Value::Null => Ok(None),
        v => parse_slot(Slot::Third, v).map(Some),
    };

    match (first, second, third) {
        (Ok(first), Ok(second), Ok(third)) => Ok(Move { first, second, third }),
        (first, second, third) => Err(Validation::from_slots([
            first.map(|_| ()),
            second.map(|_| ()),
            third.map(|_| ()),
        ])),
    }
}

fn parse_slot(slot: Slot, value: &Value) -> Result<Order, String> {
    let Some(kind) = value.get("type") else {
        return Err(format!("No type for {} order", slot));
    };
    let known = kind
        .as_str()
        .is_some_and(|k| OrderKind::ALL.iter().any(|o| o.as_str() == k));
    if !known {
        return Err(format!("Wrong type for {} order", slot));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| format!("Malformed {} order: {}", slot, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_move() {
        let mv = parse_move(&json!({
            "first": { "type": "deploy", "color": "red", "to": 2 },
            "second": { "type": "transfer", "color": "blue", "from": 3, "to": 1 },
            "third": null,
        }))
        .unwrap();
        assert_eq!(mv.first, Order::Deploy { color: Color::Red, to: PlayerId(2) });
        assert_eq!(
            mv.second,
            Order::Transfer { color: Color::Blue, from: PlayerId(3), to: PlayerId(1) }
        );
        assert_eq!(mv.third, None);
    }

    #[test]
    fn test_missing_slot_is_incomplete() {
        let err = parse_move(&json!({
            "first": { "type": "deploy", "color": "red", "to": 2 },
            "second": { "type": "deploy", "color": "red", "to": 1 },
        }))
        .unwrap_err();
        assert!(!err.valid);
        assert_eq!(err.messages, vec!["Incomplete move".to_string()]);
    }

    #[test]
    fn test_slot_errors_keep_three_messages() {
        let err = parse_move(&json!({
            "first": { "color": "red", "to": 2 },
            "second": { "type": "steal", "color": "red", "to": 1 },
            "third": null,
        }))
        .unwrap_err();
        assert_eq!(err.messages.len(), 3);
        assert_eq!(err.messages[0], "No type for first order");
        assert_eq!(err.messages[1], "Wrong type for second order");
        assert_eq!(err.messages[2], "");
    }

    #[test]
    fn test_move_round_trips_through_json() {
        let mv = Move::new(
            Order::Ninja { color: Color::Green, to: PlayerId(4) },
            Order::Deploy { color: Color::Yellow, to: PlayerId(1) },
            Some(Order::Attack { color: Color::Purple, to: PlayerId(2) }),
        );
        let value = serde_json::to_value(mv).unwrap();
        assert_eq!(value["first"]["type"], "ninja");
        assert_eq!(parse_move(&value).unwrap(), mv);
    }

    #[test]
    fn test_slot_allows() {
        assert!(Slot::First.allows(OrderKind::Ninja));
        assert!(!Slot::First.allows(OrderKind::Transfer));
        assert!(Slot::Second.allows(OrderKind::Transfer));
        assert!(!Slot::Third.allows(OrderKind::Deploy));
    }
}
