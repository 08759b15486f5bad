//! Stage Layout
//!
//! Where each fighter stands on screen, and where effects for a hit on
//! that fighter are anchored. The host owns the real window; this is the
//! contract the battle engine asks for a point through.

use serde::{Serialize, Deserialize};

use crate::core::vec2::{Rect, Vec2};
use crate::game::state::Side;

/// Fighter slot height as a fraction of the viewport height.
pub const SLOT_HEIGHT_FRACTION: f32 = 0.90;

/// Base spacing unit between slots and the window edge.
pub const STAGE_SPACING: f32 = 20.0;

/// Slots are raised this many pixels above vertical center.
pub const SLOT_RAISE: f32 = 50.0;

/// Horizontal lunge toward the opponent while attacking.
pub const LUNGE_OFFSET: f32 = 10.0;

/// Stage errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageError {
    /// The host has not laid out this slot yet.
    #[error("{0} fighter slot has not been laid out")]
    SlotNotLaidOut(Side),
}

/// Supplies anchor points for effects spawned on a fighter.
pub trait Stage: Send + Sync {
    /// Screen point where effects for a hit on `side` appear.
    fn anchor(&self, side: Side) -> Result<Vec2, StageError>;
}

/// Two square fighter slots mirroring the battle window layout.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct StageLayout {
    left: Rect,
    right: Rect,
}

impl StageLayout {
    /// Lay out slots for a viewport.
    ///
    /// Slots are squares of 90% viewport height, inset `3 * spacing` from
    /// the side edges and raised [`SLOT_RAISE`] above vertical center.
    /// A degenerate viewport yields empty slots.
    pub fn for_viewport(width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self::default();
        }

        let size = (height * SLOT_HEIGHT_FRACTION).floor();
        let center_y = ((height - size) / 2.0).floor();
        let top = center_y - SLOT_RAISE;
        let margin = STAGE_SPACING * 3.0;

        Self {
            left: Rect::new(margin, top, size, size),
            right: Rect::new(width - size - margin, top, size, size),
        }
    }

    /// Explicit slots.
    pub fn from_slots(left: Rect, right: Rect) -> Self {
        Self { left, right }
    }

    /// Recompute after the host window resized.
    pub fn resize(&mut self, width: f32, height: f32) {
        *self = Self::for_viewport(width, height);
    }

    /// Slot rectangle for a side.
    pub fn slot(&self, side: Side) -> Rect {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Horizontal sprite offset for a side while its attack pose is active.
    pub fn lunge_offset(side: Side, attacking: bool) -> f32 {
        match (side, attacking) {
            (_, false) => 0.0,
            (Side::Left, true) => LUNGE_OFFSET,
            (Side::Right, true) => -LUNGE_OFFSET,
        }
    }
}

impl Stage for StageLayout {
    /// Horizontal center, one third down the slot.
    fn anchor(&self, side: Side) -> Result<Vec2, StageError> {
        let slot = self.slot(side);
        if slot.is_empty() {
            return Err(StageError::SlotNotLaidOut(side));
        }
        Ok(Vec2::new(
            slot.x + (slot.width / 2.0).floor(),
            slot.y + (slot.height / 3.0).floor(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_for_viewport() {
        let layout = StageLayout::for_viewport(1280.0, 720.0);

        // 90% of 720 = 648; center_y = 36; raised 50
        assert_eq!(layout.slot(Side::Left), Rect::new(60.0, -14.0, 648.0, 648.0));
        assert_eq!(layout.slot(Side::Right), Rect::new(572.0, -14.0, 648.0, 648.0));
    }

    #[test]
    fn test_anchor_is_center_top_third() {
        let layout = StageLayout::for_viewport(1280.0, 720.0);
        assert_eq!(layout.anchor(Side::Left).unwrap(), Vec2::new(384.0, 202.0));
        assert_eq!(layout.anchor(Side::Right).unwrap(), Vec2::new(896.0, 202.0));
    }

    #[test]
    fn test_unlaid_stage_fails() {
        let layout = StageLayout::default();
        assert_eq!(layout.anchor(Side::Left), Err(StageError::SlotNotLaidOut(Side::Left)));

        let degenerate = StageLayout::for_viewport(0.0, 600.0);
        assert!(degenerate.anchor(Side::Right).is_err());
    }

    #[test]
    fn test_explicit_slots() {
        let layout = StageLayout::from_slots(
            Rect::new(0.0, 0.0, 90.0, 90.0),
            Rect::new(200.0, 30.0, 90.0, 90.0),
        );
        assert_eq!(layout.anchor(Side::Left).unwrap(), Vec2::new(45.0, 30.0));
        assert_eq!(layout.anchor(Side::Right).unwrap(), Vec2::new(245.0, 60.0));
    }

    #[test]
    fn test_resize() {
        let mut layout = StageLayout::default();
        layout.resize(800.0, 600.0);
        assert!(layout.anchor(Side::Right).is_ok());
    }

    #[test]
    fn test_lunge_toward_opponent() {
        assert_eq!(StageLayout::lunge_offset(Side::Left, true), 10.0);
        assert_eq!(StageLayout::lunge_offset(Side::Right, true), -10.0);
        assert_eq!(StageLayout::lunge_offset(Side::Right, false), 0.0);
    }
}
