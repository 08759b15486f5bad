//! Rendering Boundary
//!
//! The two contracts the core shares with its rendering host:
//! - `surface`: the drawing sink effects paint into
//! - `stage`: fighter slots and effect anchor points

pub mod surface;
pub mod stage;

pub use surface::{Surface, CommandBuffer, DrawCommand};
pub use stage::{Stage, StageLayout, StageError};
