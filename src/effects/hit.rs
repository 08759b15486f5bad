//! Hit Effect
//!
//! An eight-ray starburst that grows from the impact point while fading
//! from warm yellow to transparent orange.

use std::f32::consts::FRAC_PI_4;

use crate::core::color::Rgba;
use crate::core::vec2::Vec2;
use crate::effects::EffectTimer;
use crate::render::surface::Surface;

/// Seconds a hit stays on screen.
pub const HIT_LIFETIME: f32 = 0.5;

/// Starburst radius at spawn.
pub const HIT_START_SIZE: f32 = 5.0;

/// Radius growth in pixels per second.
pub const HIT_EXPAND_RATE: f32 = 50.0;

/// Number of rays in the starburst.
pub const HIT_RAYS: usize = 8;

/// Color at spawn.
pub const HIT_START_COLOR: Rgba = Rgba::new(255, 220, 100, 255);

/// Color at completion.
pub const HIT_END_COLOR: Rgba = Rgba::new(255, 100, 0, 0);

/// Glow strokes, drawn widest first.
const GLOW_PASSES: u8 = 4;
const GLOW_ALPHA: f32 = 0.3;
const FILL_ALPHA: f32 = 0.5;

/// Starburst at the point of impact.
#[derive(Clone, Debug, PartialEq)]
pub struct HitEffect {
    position: Vec2,
    timer: EffectTimer,
}

impl HitEffect {
    /// Spawn at a screen point.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            timer: EffectTimer::new(HIT_LIFETIME),
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.timer.advance(dt);
    }

    /// Impact point.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Lifetime state.
    pub fn timer(&self) -> &EffectTimer {
        &self.timer
    }

    /// Current ray length. Keeps growing until the effect is culled.
    pub fn size(&self) -> f32 {
        HIT_START_SIZE + HIT_EXPAND_RATE * self.timer.elapsed()
    }

    /// Current color.
    pub fn color(&self) -> Rgba {
        Rgba::lerp(HIT_START_COLOR, HIT_END_COLOR, self.timer.progress())
    }

    /// Ray tips, clockwise from +X.
    pub fn ray_endpoints(&self) -> [Vec2; HIT_RAYS] {
        let size = self.size();
        let mut points = [self.position; HIT_RAYS];
        for (i, point) in points.iter_mut().enumerate() {
            *point = self.position + Vec2::from_angle(i as f32 * FRAC_PI_4, size);
        }
        points
    }

    /// Glow strokes (widths 5, 4, 3, 2) then a half-alpha fill.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let color = self.color();
        let rays = self.ray_endpoints();

        let glow = color.scale_alpha(GLOW_ALPHA);
        for pass in (0..GLOW_PASSES).rev() {
            surface.stroke_rays(self.position, &rays, glow, 2.0 + pass as f32);
        }
        surface.fill_polygon(&rays, color.scale_alpha(FILL_ALPHA));
    }
}
