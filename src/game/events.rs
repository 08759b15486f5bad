//! Battle Events
//!
//! Structured records of what happened, for renderers and replay checks.

use serde::{Serialize, Deserialize};

use crate::game::archetype::{Strike, StrikeKind};
use crate::game::state::Side;

/// Battle event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleEventData {
    /// Coin flip decided the opener
    BattleStarted {
        first_side: Side,
        first_attacker_name: String,
    },

    /// One exchange was applied
    TurnResolved {
        attacker_side: Side,
        attacker_name: String,
        defender_name: String,
        damage: i32,
        is_critical: bool,
        strike_kind: StrikeKind,
        defender_health: i32,
    },

    /// A turn failed and was skipped
    TurnFailed {
        reason: String,
        consecutive_failures: u32,
    },

    /// A fighter fell
    BattleEnded {
        winner_side: Side,
        winner_name: String,
    },

    /// Battle stopped without a winner
    BattleAborted {
        reason: String,
    },
}

/// A battle event stamped with the turn counter at emission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEvent {
    /// Resolved turns before this event (the resolving turn counts itself)
    pub turn: u32,

    /// Event data
    pub data: BattleEventData,
}

impl BattleEvent {
    /// Create a new event.
    pub fn new(turn: u32, data: BattleEventData) -> Self {
        Self { turn, data }
    }

    /// Create battle started event.
    pub fn battle_started(first_side: Side, first_attacker_name: String) -> Self {
        Self::new(
            0,
            BattleEventData::BattleStarted {
                first_side,
                first_attacker_name,
            },
        )
    }

    /// Create turn resolved event.
    pub fn turn_resolved(
        turn: u32,
        attacker_side: Side,
        attacker_name: String,
        defender_name: String,
        strike: Strike,
        defender_health: i32,
    ) -> Self {
        Self::new(
            turn,
            BattleEventData::TurnResolved {
                attacker_side,
                attacker_name,
                defender_name,
                damage: strike.damage,
                is_critical: strike.is_critical(),
                strike_kind: strike.kind,
                defender_health,
            },
        )
    }

    /// Create turn failed event.
    pub fn turn_failed(turn: u32, reason: String, consecutive_failures: u32) -> Self {
        Self::new(
            turn,
            BattleEventData::TurnFailed {
                reason,
                consecutive_failures,
            },
        )
    }

    /// Create battle ended event.
    pub fn battle_ended(turn: u32, winner_side: Side, winner_name: String) -> Self {
        Self::new(
            turn,
            BattleEventData::BattleEnded {
                winner_side,
                winner_name,
            },
        )
    }

    /// Create battle aborted event.
    pub fn battle_aborted(turn: u32, reason: String) -> Self {
        Self::new(turn, BattleEventData::BattleAborted { reason })
    }

    /// True for the events that close a battle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            BattleEventData::BattleEnded { .. } | BattleEventData::BattleAborted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_resolved_carries_criticality() {
        let strike = Strike { damage: 30, base: 20, kind: StrikeKind::Critical };
        let event = BattleEvent::turn_resolved(4, Side::Right, "B".into(), "A".into(), strike, 55);

        match event.data {
            BattleEventData::TurnResolved { damage, is_critical, strike_kind, defender_health, .. } => {
                assert_eq!(damage, 30);
                assert!(is_critical);
                assert_eq!(strike_kind, StrikeKind::Critical);
                assert_eq!(defender_health, 55);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(event.turn, 4);
    }

    #[test]
    fn test_terminal_events() {
        assert!(BattleEvent::battle_ended(9, Side::Left, "A".into()).is_terminal());
        assert!(BattleEvent::battle_aborted(2, "x".into()).is_terminal());
        assert!(!BattleEvent::turn_failed(2, "x".into(), 1).is_terminal());
    }

    #[test]
    fn test_json_shape() {
        let event = BattleEvent::battle_ended(12, Side::Left, "A".into());
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["turn"], 12);
        assert_eq!(json["data"]["type"], "BattleEnded");
        assert_eq!(json["data"]["winner_name"], "A");
        assert_eq!(json["data"]["winner_side"], "Left");

        let back: BattleEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
