//! Fighter Entity
//!
//! A named champion with clamped health and one archetype strategy.
//! Fighters are built once per battle and never reset.

use serde::{Serialize, Deserialize};

use crate::core::color::Rgba;
use crate::core::hash::StateHasher;
use crate::core::rng::DeterministicRng;
use crate::game::archetype::{Archetype, CharacterType, Strike};

/// Fighter construction and invariant errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FighterError {
    /// Name was empty or whitespace.
    #[error("Fighter name cannot be empty or whitespace.")]
    EmptyName,

    /// Max health must be positive.
    #[error("Maximum health must be greater than 0 (got {0}).")]
    InvalidMaxHealth(i32),

    /// Selector did not match any champion type.
    #[error("Unknown champion type: {0}")]
    UnknownCharacterType(String),

    /// Damage amounts are never negative.
    #[error("Damage cannot be negative (got {0}).")]
    NegativeDamage(i32),

    /// Heal amounts are never negative.
    #[error("Heal amount cannot be negative (got {0}).")]
    NegativeHeal(i32),
}

/// Health bands used to color the health label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthTier {
    /// Above 50%.
    Healthy,
    /// Above 20%.
    Warning,
    /// 20% or less.
    Critical,
}

impl HealthTier {
    /// Classify a health fraction in [0, 1].
    pub fn from_fraction(fraction: f32) -> Self {
        if fraction > 0.5 {
            HealthTier::Healthy
        } else if fraction > 0.2 {
            HealthTier::Warning
        } else {
            HealthTier::Critical
        }
    }

    /// Label color for this tier.
    pub fn color(self) -> Rgba {
        match self {
            HealthTier::Healthy => Rgba::rgb(100, 255, 100),
            HealthTier::Warning => Rgba::rgb(255, 200, 0),
            HealthTier::Critical => Rgba::rgb(255, 80, 80),
        }
    }
}

/// A champion in a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    name: String,
    max_health: i32,
    health: i32,
    archetype: Archetype,
}

impl Fighter {
    /// Create a fighter of the given type at full health.
    pub fn new(name: &str, character_type: CharacterType) -> Result<Self, FighterError> {
        Self::with_max_health(name, character_type.max_health(), Archetype::new(character_type))
    }

    /// Create a fighter from a selector string such as `"Ante Maloi Crusader"`.
    pub fn from_selector(selector: &str, name: &str) -> Result<Self, FighterError> {
        let character_type = CharacterType::from_selector(selector)?;
        Self::new(name, character_type)
    }

    /// Create a fighter with explicit max health and strategy.
    pub fn with_max_health(
        name: &str,
        max_health: i32,
        archetype: Archetype,
    ) -> Result<Self, FighterError> {
        let name = validate_name(name)?;
        if max_health <= 0 {
            return Err(FighterError::InvalidMaxHealth(max_health));
        }

        Ok(Self {
            name,
            max_health,
            health: max_health,
            archetype,
        })
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name (same validation as construction).
    pub fn rename(&mut self, name: &str) -> Result<(), FighterError> {
        self.name = validate_name(name)?;
        Ok(())
    }

    /// Current health.
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Still standing?
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Champion type.
    pub fn character_type(&self) -> CharacterType {
        self.archetype.character_type()
    }

    /// Strategy state (read-only).
    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Roll an attack using the battle RNG.
    pub fn attack(&mut self, rng: &mut DeterministicRng) -> Strike {
        self.archetype.attack(rng)
    }

    /// Apply damage. Negative amounts are rejected and leave health unchanged.
    pub fn take_damage(&mut self, damage: i32) -> Result<(), FighterError> {
        if damage < 0 {
            return Err(FighterError::NegativeDamage(damage));
        }
        self.set_health(self.health.saturating_sub(damage));
        Ok(())
    }

    /// Restore health up to max. Negative amounts are rejected.
    pub fn heal(&mut self, amount: i32) -> Result<(), FighterError> {
        if amount < 0 {
            return Err(FighterError::NegativeHeal(amount));
        }
        self.set_health(self.health.saturating_add(amount));
        Ok(())
    }

    /// Health as a fraction of max.
    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.max_health.max(1) as f32
    }

    /// Health band for label coloring.
    pub fn health_tier(&self) -> HealthTier {
        HealthTier::from_fraction(self.health_fraction())
    }

    /// Two-line health label: name, then `HP: current/max`.
    pub fn health_label(&self) -> String {
        format!("{}\nHP: {}/{}", self.name, self.health, self.max_health)
    }

    /// Add fighter state to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_str(&self.name);
        hasher.update_i32(self.max_health);
        hasher.update_i32(self.health);
        self.archetype.hash_into(hasher);
    }

    // Every health write goes through here.
    fn set_health(&mut self, value: i32) {
        self.health = value.clamp(0, self.max_health);
    }
}

fn validate_name(name: &str) -> Result<String, FighterError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FighterError::EmptyName);
    }
    Ok(trimmed.to_string())
}
