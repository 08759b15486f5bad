//! Ephemeral Visual Effects
//!
//! Short-lived visuals spawned when a strike lands. Every derived visual
//! is a pure function of the effect's elapsed time, so drawing never
//! mutates an effect.
//!
//! ## Module Structure
//!
//! - `hit`: Expanding starburst at the impact point
//! - `damage_number`: Rising, fading damage text
//! - `clock`: Animation clock (ticks effects and the attack pose)

pub mod hit;
pub mod damage_number;
pub mod clock;

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::render::surface::Surface;

pub use hit::HitEffect;
pub use damage_number::DamageNumberEffect;
pub use clock::{AnimationClock, AttackPose};

/// Completion slack relative to elapsed time (one f32 ulp).
///
/// Absorbs the rounding of each step to f32, so stepping a lifetime by an
/// exact divisor completes after `lifetime / step` steps, but a step even
/// slightly short of a divisor still needs the extra step.
pub const COMPLETION_TOLERANCE: f64 = f32::EPSILON as f64;

// =============================================================================
// TIMER
// =============================================================================

/// Lifetime bookkeeping shared by every effect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectTimer {
    lifetime: f32,
    // Accumulated in f64 so summing many f32 steps adds no error of its own.
    elapsed: f64,
    complete: bool,
}

impl EffectTimer {
    /// Fresh timer. `lifetime` is in seconds and must be positive.
    pub const fn new(lifetime: f32) -> Self {
        Self {
            lifetime,
            elapsed: 0.0,
            complete: false,
        }
    }

    /// Age by `dt` seconds. Non-positive or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if self.complete || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += f64::from(dt);
        if self.elapsed * (1.0 + COMPLETION_TOLERANCE) >= f64::from(self.lifetime) {
            self.complete = true;
        }
    }

    /// Seconds since spawn.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    /// Total lifetime in seconds.
    #[inline]
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// `elapsed / lifetime` in `[0, 1]`, exactly 1 once complete.
    pub fn progress(&self) -> f32 {
        if self.complete {
            return 1.0;
        }
        (self.elapsed() / self.lifetime).clamp(0.0, 1.0)
    }

    /// Lifetime used up.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

// =============================================================================
// EFFECT
// =============================================================================

/// Any effect the clock can schedule.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Impact starburst
    Hit(HitEffect),
    /// Floating damage text
    DamageNumber(DamageNumberEffect),
}

impl Effect {
    /// Advance by one step of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        match self {
            Effect::Hit(effect) => effect.update(dt),
            Effect::DamageNumber(effect) => effect.update(dt),
        }
    }

    /// Paint the current frame.
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self {
            Effect::Hit(effect) => effect.draw(surface),
            Effect::DamageNumber(effect) => effect.draw(surface),
        }
    }

    /// Finished and ready to cull.
    pub fn is_complete(&self) -> bool {
        self.timer().is_complete()
    }

    /// Spawn point (fixed for the effect's life).
    pub fn position(&self) -> Vec2 {
        match self {
            Effect::Hit(effect) => effect.position(),
            Effect::DamageNumber(effect) => effect.position(),
        }
    }

    /// Shared lifetime state.
    pub fn timer(&self) -> &EffectTimer {
        match self {
            Effect::Hit(effect) => effect.timer(),
            Effect::DamageNumber(effect) => effect.timer(),
        }
    }
}

impl From<HitEffect> for Effect {
    fn from(effect: HitEffect) -> Self {
        Effect::Hit(effect)
    }
}

impl From<DamageNumberEffect> for Effect {
    fn from(effect: DamageNumberEffect) -> Self {
        Effect::DamageNumber(effect)
    }
}

// =============================================================================
// EFFECT SET
// =============================================================================

/// Active effects in spawn order (drawn back-to-front).
#[derive(Clone, Debug, Default)]
pub struct EffectSet {
    effects: Vec<Effect>,
}

impl EffectSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect on top of the others.
    pub fn spawn(&mut self, effect: impl Into<Effect>) {
        self.effects.push(effect.into());
    }

    /// One clock step.
    ///
    /// Effects that completed on an earlier step are dropped first, then
    /// the survivors age by `dt`. Survivor order is unchanged. Returns the
    /// number of effects culled.
    pub fn advance(&mut self, dt: f32) -> usize {
        let before = self.effects.len();
        self.effects.retain(|effect| !effect.is_complete());
        let culled = before - self.effects.len();

        for effect in &mut self.effects {
            effect.update(dt);
        }
        culled
    }

    /// Draw every effect, oldest first.
    pub fn draw(&self, surface: &mut dyn Surface) {
        for effect in &self.effects {
            effect.draw(surface);
        }
    }

    /// Number of active effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// No active effects?
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Effects in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_ignores_bad_steps() {
        let mut timer = EffectTimer::new(1.0);
        timer.advance(0.0);
        timer.advance(-0.5);
        timer.advance(f32::NAN);
        timer.advance(f32::INFINITY);
        assert_eq!(timer.elapsed(), 0.0);
        assert!(!timer.is_complete());
    }

    #[test]
    fn test_timer_progress_snaps_when_complete() {
        let mut timer = EffectTimer::new(0.5);
        timer.advance(0.25);
        assert!((timer.progress() - 0.5).abs() < 1e-6);

        // Overshoot still reports exactly 1
        timer.advance(0.4);
        assert!(timer.is_complete());
        assert_eq!(timer.progress(), 1.0);

        // Complete timers stop aging
        let elapsed = timer.elapsed();
        timer.advance(0.1);
        assert_eq!(timer.elapsed(), elapsed);
    }

    fn steps_to_complete(lifetime: f32, dt: f32) -> u32 {
        let mut timer = EffectTimer::new(lifetime);
        let mut steps = 0;
        while !timer.is_complete() {
            timer.advance(dt);
            steps += 1;
            assert!(steps < 10_000);
        }
        steps
    }

    #[test]
    fn test_exact_divisor_steps() {
        assert_eq!(steps_to_complete(0.5, 0.05), 10);
        assert_eq!(steps_to_complete(0.5, 0.02), 25);
        assert_eq!(steps_to_complete(1.0, 0.05), 20);
        assert_eq!(steps_to_complete(0.3, 0.1), 3);
        assert_eq!(steps_to_complete(1.0, 0.001), 1000);
    }

    #[test]
    fn test_step_just_short_of_divisor_needs_extra_step() {
        for (lifetime, dt) in [(0.5f32, 0.24999f32), (0.5, 0.04999), (1.0, 0.0999), (0.5, 0.0249999)] {
            let expected = (lifetime / dt).ceil() as u32;
            assert_eq!(steps_to_complete(lifetime, dt), expected, "dt = {}", dt);
        }
        assert_eq!(steps_to_complete(0.5, 0.24999), 3);
    }

    #[test]
    fn test_set_culls_on_following_step() {
        let mut set = EffectSet::new();
        set.spawn(HitEffect::new(Vec2::new(10.0, 10.0)));
        set.spawn(DamageNumberEffect::new(Vec2::new(10.0, 10.0), 12, false));

        let mut culled = 0;
        for _ in 0..10 {
            culled += set.advance(0.05);
        }
        // Hit finished on the 10th step but is still drawn once at full fade
        assert_eq!(culled, 0);
        assert!(set.iter().next().map(Effect::is_complete).unwrap_or(false));

        assert_eq!(set.advance(0.05), 1);
        assert_eq!(set.len(), 1);
        assert!(matches!(set.iter().next(), Some(Effect::DamageNumber(_))));

        for _ in 0..10 {
            set.advance(0.05);
        }
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_preserves_order() {
        let mut set = EffectSet::new();
        for i in 0..4 {
            set.spawn(DamageNumberEffect::new(Vec2::new(i as f32, 0.0), i, false));
        }
        set.spawn(HitEffect::new(Vec2::default()));

        // Hit dies first; the rest keep spawn order
        for _ in 0..11 {
            set.advance(0.05);
        }
        let xs: Vec<f32> = set.iter().map(|e| e.position().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
