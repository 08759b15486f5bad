//! Game Logic Module
//!
//! All battle simulation code. Deterministic given the seed.
//!
//! ## Module Structure
//!
//! - `archetype`: Champion types and their damage strategies
//! - `fighter`: Named fighter with clamped health
//! - `state`: Battle state, sides, phase, log
//! - `turn`: Turn resolution and headless replay
//! - `events`: Battle events for renderers and replay checks

pub mod archetype;
pub mod fighter;
pub mod state;
pub mod turn;
pub mod events;

// Re-export key types
pub use archetype::{Archetype, CharacterType, Strike, StrikeKind};
pub use fighter::{Fighter, FighterError, HealthTier};
pub use state::{BattleState, BattlePhase, BattleError, Side};
pub use turn::{resolve_turn, replay_battle, TurnOutcome, TurnReport, TurnError};
pub use events::{BattleEvent, BattleEventData};
