//! Champion Archetypes
//!
//! Each champion type rolls damage with its own small state machine.
//! All rolls come from the battle's [`DeterministicRng`].

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::core::hash::StateHasher;
use crate::game::fighter::FighterError;

/// Crusader base damage range [min, max).
pub const CRUSADER_BASE_DAMAGE: (i32, i32) = (15, 25);

/// Crusader: every Nth consecutive hit is empowered.
pub const HITS_FOR_EMPOWER: u8 = 3;

/// Adventurer quick strike range [min, max] (after a big hit).
pub const QUICK_STRIKE_DAMAGE: (i32, i32) = (10, 15);

/// Adventurer power strike range [min, max].
pub const POWER_STRIKE_DAMAGE: (i32, i32) = (18, 30);

/// Adventurer switches to quick strikes when the last hit exceeded this.
pub const ADVENTURER_DAMAGE_THRESHOLD: i32 = 20;

/// Sorcerer base damage range [min, max).
pub const SORCERER_BASE_DAMAGE: (i32, i32) = (12, 25);

/// Sorcerer critical chance per attack.
pub const SORCERER_CRIT_CHANCE: f64 = 0.20;

// =============================================================================
// CHARACTER TYPE (selector)
// =============================================================================

/// The closed set of selectable champion types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CharacterType {
    /// The OA Sorcerer: crit-based spellcaster.
    Sorcerer = 0,
    /// Ante Maloi Crusader: every third hit is empowered.
    Crusader = 1,
    /// The Tao Lang Adventurer: alternates quick and power strikes.
    Adventurer = 2,
}

impl CharacterType {
    /// All types, in selector order.
    pub const ALL: [CharacterType; 3] = [
        CharacterType::Sorcerer,
        CharacterType::Crusader,
        CharacterType::Adventurer,
    ];

    /// Display name, which is also the selector string.
    pub fn display_name(self) -> &'static str {
        match self {
            CharacterType::Sorcerer => "The OA Sorcerer",
            CharacterType::Crusader => "Ante Maloi Crusader",
            CharacterType::Adventurer => "The Tao Lang Adventurer",
        }
    }

    /// Fixed maximum health for this type.
    pub fn max_health(self) -> i32 {
        match self {
            CharacterType::Crusader => 100,
            CharacterType::Adventurer => 110,
            CharacterType::Sorcerer => 120,
        }
    }

    /// Resolve a selector string (exact match on the display name).
    pub fn from_selector(selector: &str) -> Result<Self, FighterError> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.display_name() == selector)
            .ok_or_else(|| FighterError::UnknownCharacterType(selector.to_string()))
    }
}

impl FromStr for CharacterType {
    type Err = FighterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_selector(s)
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// =============================================================================
// STRIKE
// =============================================================================

/// How a strike's damage was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeKind {
    /// Unmodified base roll.
    Normal,
    /// Crusader's third consecutive hit (x1.8).
    Empowered,
    /// Adventurer's small follow-up after a big hit.
    Quick,
    /// Adventurer's big swing.
    Power,
    /// Sorcerer critical (x1.5).
    Critical,
}

/// Result of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strike {
    /// Damage to apply (never negative).
    pub damage: i32,
    /// The raw roll before any multiplier.
    pub base: i32,
    /// Which rule produced the damage.
    pub kind: StrikeKind,
}

impl Strike {
    /// Strike whose damage is its base roll.
    pub const fn plain(base: i32, kind: StrikeKind) -> Self {
        Self { damage: base, base, kind }
    }

    /// Critical hits get the enlarged red damage number.
    pub fn is_critical(&self) -> bool {
        self.kind == StrikeKind::Critical
    }
}

// =============================================================================
// ARCHETYPE
// =============================================================================

/// Damage strategy plus its private per-fighter state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Counts hits; every third is empowered.
    Crusader {
        /// Hits since the last empowered strike (0..=2 between calls).
        consecutive_hits: u8,
    },
    /// Picks its next range from the previous roll.
    Adventurer {
        /// Damage of the previous attack (0 before the first).
        last_damage: i32,
    },
    /// Stateless apart from the shared RNG.
    Sorcerer,
}

impl Archetype {
    /// Fresh strategy state for a character type.
    pub fn new(character_type: CharacterType) -> Self {
        match character_type {
            CharacterType::Crusader => Archetype::Crusader { consecutive_hits: 0 },
            CharacterType::Adventurer => Archetype::Adventurer { last_damage: 0 },
            CharacterType::Sorcerer => Archetype::Sorcerer,
        }
    }

    /// Which character type this strategy belongs to.
    pub fn character_type(&self) -> CharacterType {
        match self {
            Archetype::Crusader { .. } => CharacterType::Crusader,
            Archetype::Adventurer { .. } => CharacterType::Adventurer,
            Archetype::Sorcerer => CharacterType::Sorcerer,
        }
    }

    /// Roll one attack.
    pub fn attack(&mut self, rng: &mut DeterministicRng) -> Strike {
        match self {
            Archetype::Crusader { consecutive_hits } => {
                let base = rng.next_int_below(CRUSADER_BASE_DAMAGE.0, CRUSADER_BASE_DAMAGE.1);
                *consecutive_hits += 1;

                if *consecutive_hits >= HITS_FOR_EMPOWER {
                    *consecutive_hits = 0;
                    // floor(base * 1.8)
                    Strike { damage: base * 9 / 5, base, kind: StrikeKind::Empowered }
                } else {
                    Strike::plain(base, StrikeKind::Normal)
                }
            }
            Archetype::Adventurer { last_damage } => {
                let (range, kind) = if *last_damage > ADVENTURER_DAMAGE_THRESHOLD {
                    (QUICK_STRIKE_DAMAGE, StrikeKind::Quick)
                } else {
                    (POWER_STRIKE_DAMAGE, StrikeKind::Power)
                };

                let damage = rng.next_int_range(range.0, range.1);
                *last_damage = damage;
                Strike::plain(damage, kind)
            }
            Archetype::Sorcerer => {
                let base = rng.next_int_below(SORCERER_BASE_DAMAGE.0, SORCERER_BASE_DAMAGE.1);

                if rng.next_chance(SORCERER_CRIT_CHANCE) {
                    // floor(base * 1.5)
                    Strike { damage: base * 3 / 2, base, kind: StrikeKind::Critical }
                } else {
                    Strike::plain(base, StrikeKind::Normal)
                }
            }
        }
    }

    /// Add strategy state to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.character_type() as u8);
        match self {
            Archetype::Crusader { consecutive_hits } => hasher.update_u8(*consecutive_hits),
            Archetype::Adventurer { last_damage } => hasher.update_i32(*last_damage),
            Archetype::Sorcerer => {}
        }
    }
}
