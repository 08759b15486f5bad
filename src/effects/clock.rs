//! Animation Clock
//!
//! Fixed-step driver for everything that moves between turns: effects
//! age and get culled, and the attacker's pose frame advances. The
//! runtime calls [`AnimationClock::tick`] every 50 ms; tests call it
//! directly.

use serde::{Serialize, Deserialize};
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::vec2::Vec2;
use crate::effects::{EffectSet, HitEffect, DamageNumberEffect};
use crate::game::archetype::Strike;
use crate::game::state::Side;
use crate::render::surface::Surface;

/// Frames in the attack pose cycle.
pub const ATTACK_POSE_FRAMES: u8 = 5;

/// Which fighter is mid-attack, and its pose frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackPose {
    attacker: Option<Side>,
    frame: u8,
}

impl AttackPose {
    /// Start the pose for `side` at frame 0.
    pub fn begin(&mut self, side: Side) {
        self.attacker = Some(side);
        self.frame = 0;
    }

    /// Clear the pose.
    pub fn end(&mut self) {
        self.attacker = None;
        self.frame = 0;
    }

    /// Next frame, wrapping. No-op while idle.
    pub fn advance(&mut self) {
        if self.attacker.is_some() {
            self.frame = (self.frame + 1) % ATTACK_POSE_FRAMES;
        }
    }

    /// Side currently attacking.
    pub fn attacker(&self) -> Option<Side> {
        self.attacker
    }

    /// Current frame in `0..ATTACK_POSE_FRAMES`.
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Is `side` drawn in its attack pose?
    pub fn is_attacking(&self, side: Side) -> bool {
        self.attacker == Some(side)
    }
}

/// Effects plus the attack pose, advanced in fixed steps.
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    effects: EffectSet,
    pose: AttackPose,
    ticks: u64,
}

impl AnimationClock {
    /// Idle clock with no effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_seconds`.
    pub fn tick(&mut self, delta_seconds: f32) {
        let _culled = self.effects.advance(delta_seconds);
        self.pose.advance();
        self.ticks += 1;

        #[cfg(feature = "debug-tracing")]
        trace!(
            tick = self.ticks,
            culled = _culled,
            active = self.effects.len(),
            pose_frame = self.pose.frame,
            "Animation tick"
        );
    }

    /// Spawn the hit starburst and damage number for a landed strike.
    pub fn spawn_hit(&mut self, anchor: Vec2, strike: &Strike) {
        self.effects.spawn(HitEffect::new(anchor));
        self.effects
            .spawn(DamageNumberEffect::new(anchor, strike.damage, strike.is_critical()));
    }

    /// Put `side` into its attack pose.
    pub fn begin_attack(&mut self, side: Side) {
        self.pose.begin(side);
    }

    /// Return to idle.
    pub fn end_attack(&mut self) {
        self.pose.end();
    }

    /// Paint every active effect.
    pub fn draw(&self, surface: &mut dyn Surface) {
        self.effects.draw(surface);
    }

    /// Active effects.
    pub fn effects(&self) -> &EffectSet {
        &self.effects
    }

    /// Current attack pose.
    pub fn pose(&self) -> AttackPose {
        self.pose
    }

    /// Ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effect;
    use crate::game::archetype::StrikeKind;
    use crate::render::surface::CommandBuffer;
    use crate::ANIMATION_STEP_SECONDS;

    #[test]
    fn test_pose_wraps_every_five_frames() {
        let mut clock = AnimationClock::new();
        clock.tick(ANIMATION_STEP_SECONDS);
        assert_eq!(clock.pose().frame(), 0);

        clock.begin_attack(Side::Left);
        let frames: Vec<u8> = (0..7)
            .map(|_| {
                clock.tick(ANIMATION_STEP_SECONDS);
                clock.pose().frame()
            })
            .collect();
        assert_eq!(frames, vec![1, 2, 3, 4, 0, 1, 2]);
        assert!(clock.pose().is_attacking(Side::Left));
        assert!(!clock.pose().is_attacking(Side::Right));

        clock.end_attack();
        assert_eq!(clock.pose(), AttackPose::default());
    }

    #[test]
    fn test_spawn_hit_tags_criticality() {
        let mut clock = AnimationClock::new();
        let anchor = Vec2::new(384.0, 202.0);

        clock.spawn_hit(anchor, &Strike { damage: 28, base: 19, kind: StrikeKind::Critical });
        clock.spawn_hit(anchor, &Strike { damage: 34, base: 19, kind: StrikeKind::Empowered });

        let numbers: Vec<(i32, bool)> = clock
            .effects()
            .iter()
            .filter_map(|effect| match effect {
                Effect::DamageNumber(n) => Some((n.damage(), n.is_critical())),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec![(28, true), (34, false)]);
        assert!(clock.effects().iter().all(|e| e.position() == anchor));
    }

    #[test]
    fn test_effects_expire_under_clock() {
        let mut clock = AnimationClock::new();
        clock.spawn_hit(Vec2::default(), &Strike::plain(20, StrikeKind::Normal));
        assert_eq!(clock.effects().len(), 2);

        for _ in 0..11 {
            clock.tick(ANIMATION_STEP_SECONDS);
        }
        assert_eq!(clock.effects().len(), 1);

        for _ in 0..10 {
            clock.tick(ANIMATION_STEP_SECONDS);
        }
        assert!(clock.effects().is_empty());
        assert_eq!(clock.ticks(), 21);
    }

    #[test]
    fn test_draw_delegates_to_effects() {
        let mut clock = AnimationClock::new();
        clock.spawn_hit(Vec2::new(10.0, 10.0), &Strike::plain(12, StrikeKind::Normal));
        clock.tick(ANIMATION_STEP_SECONDS);

        let mut buffer = CommandBuffer::new();
        clock.draw(&mut buffer);
        // 4 glow strokes + fill, then 9 outline + glow + main
        assert_eq!(buffer.len(), 5 + 11);
    }
}
