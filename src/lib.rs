//! # Classmates Battle
//!
//! Turn-based combat engine for Classmates RPG: two champions trade blows
//! until one falls, while a separate animation clock ages the hit effects
//! spawned by each exchange.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CLASSMATES BATTLE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives                │
//! │  ├── rng.rs        - Seeded Xorshift128+ PRNG                │
//! │  ├── vec2.rs       - Screen-space points and rectangles      │
//! │  ├── color.rs      - RGBA colors and interpolation           │
//! │  └── hash.rs       - State hashing for replay checks         │
//! │                                                              │
//! │  game/             - Battle rules (deterministic)            │
//! │  ├── archetype.rs  - Crusader / Adventurer / Sorcerer        │
//! │  ├── fighter.rs    - Health, naming, damage and healing      │
//! │  ├── state.rs      - Battle phases, turn flag, battle log    │
//! │  ├── turn.rs       - Atomic turn resolution                  │
//! │  └── events.rs     - Battle events for renderers             │
//! │                                                              │
//! │  effects/          - Cosmetic, time-bounded visuals          │
//! │  ├── hit.rs        - Expanding starburst                     │
//! │  ├── damage_number.rs - Floating damage text                 │
//! │  └── clock.rs      - Animation clock and attack pose         │
//! │                                                              │
//! │  render/           - Boundary with the rendering host        │
//! │  ├── surface.rs    - Drawing sink + command recorder         │
//! │  └── stage.rs      - Fighter slots and effect anchors        │
//! │                                                              │
//! │  runtime/          - Pacing (async, non-deterministic)       │
//! │  ├── session.rs    - Battle session and configuration        │
//! │  └── runner.rs     - Battle loop + animation clock           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are deterministic: every random draw
//! (first attacker, archetype rolls) comes from one seeded
//! [`DeterministicRng`]. Given the same seed and matchup, a battle produces
//! identical turns, log lines and final state hash. Effects use floats and
//! wall-clock pacing, but they never feed back into the battle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod effects;
pub mod game;
pub mod render;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::vec2::Vec2;
pub use effects::clock::AnimationClock;
pub use game::archetype::{Archetype, CharacterType, Strike, StrikeKind};
pub use game::fighter::{Fighter, FighterError};
pub use game::state::{BattleError, BattlePhase, BattleState, Side};
pub use runtime::runner::{BattleRunner, BattleSummary};
pub use runtime::session::{BattleConfig, BattleSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Animation clock period in milliseconds.
pub const ANIMATION_TICK_MS: u64 = 50;

/// Animation clock step in seconds (matches [`ANIMATION_TICK_MS`]).
pub const ANIMATION_STEP_SECONDS: f32 = 0.05;
