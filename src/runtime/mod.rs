//! Runtime Module
//!
//! Real-time pacing around the deterministic core.
//!
//! - `session`: One battle with its effects, stage and event channel
//! - `runner`: Async battle loop joined with the animation clock

pub mod session;
pub mod runner;

pub use session::{BattleConfig, BattleSession, BattleId, next_event};
pub use runner::{BattleRunner, BattleSummary, run_battle};
