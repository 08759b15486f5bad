//! Core deterministic primitives.
//!
//! The RNG and hasher are the foundation of battle replay. The geometry and
//! color types are plain data shared with the rendering boundary.

pub mod rng;
pub mod vec2;
pub mod color;
pub mod hash;

// Re-export core types
pub use rng::DeterministicRng;
pub use vec2::{Vec2, Rect};
pub use color::Rgba;
pub use hash::{StateHash, compute_state_hash};
