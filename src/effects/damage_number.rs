//! Damage Number Effect
//!
//! The damage value rising and wobbling above the impact point, popping
//! in over the first fifth of its life and fading out linearly.

use crate::core::color::Rgba;
use crate::core::vec2::Vec2;
use crate::effects::EffectTimer;
use crate::render::surface::Surface;

/// Seconds a damage number stays on screen.
pub const DAMAGE_NUMBER_LIFETIME: f32 = 1.0;

/// Rise speed in pixels per second (screen up is negative Y).
pub const RISE_SPEED: f32 = 60.0;

/// Horizontal wobble amplitude in pixels.
pub const WOBBLE_AMOUNT: f32 = 2.0;

/// Wobble angular frequency in radians per second.
pub const WOBBLE_FREQUENCY: f32 = 10.0;

/// Font size at scale 1.
pub const BASE_FONT_SIZE: f32 = 16.0;

/// Scale multiplier for critical hits.
pub const CRITICAL_SCALE: f32 = 1.5;

/// Fraction of the lifetime spent popping in.
pub const POP_IN_FRACTION: f32 = 0.2;

/// Text color for critical hits.
pub const CRITICAL_COLOR: Rgba = Rgba::rgb(255, 50, 50);

/// Text color for everything else.
pub const NORMAL_COLOR: Rgba = Rgba::rgb(255, 255, 200);

const GLOW_COLOR: Rgba = Rgba::rgb(255, 255, 200);
const GLOW_ALPHA: f32 = 0.5;

/// Floating damage value.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageNumberEffect {
    position: Vec2,
    damage: i32,
    critical: bool,
    timer: EffectTimer,
}

impl DamageNumberEffect {
    /// Spawn at a screen point.
    pub fn new(position: Vec2, damage: i32, critical: bool) -> Self {
        Self {
            position,
            damage,
            critical,
            timer: EffectTimer::new(DAMAGE_NUMBER_LIFETIME),
        }
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.timer.advance(dt);
    }

    /// Spawn point.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Lifetime state.
    pub fn timer(&self) -> &EffectTimer {
        &self.timer
    }

    /// Damage shown.
    pub fn damage(&self) -> i32 {
        self.damage
    }

    /// Rendered as a critical hit?
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// `"27"`, or `"27!"` for a critical.
    pub fn text(&self) -> String {
        if self.critical {
            format!("{}!", self.damage)
        } else {
            self.damage.to_string()
        }
    }

    /// Vertical offset from the spawn point.
    pub fn y_offset(&self) -> f32 {
        -RISE_SPEED * self.timer.elapsed()
    }

    /// Horizontal wobble from the spawn point.
    pub fn x_offset(&self) -> f32 {
        (WOBBLE_FREQUENCY * self.timer.elapsed()).sin() * WOBBLE_AMOUNT
    }

    /// Opacity, 255 at spawn down to 0 at completion.
    pub fn alpha(&self) -> u8 {
        (255.0 * (1.0 - self.timer.progress())).clamp(0.0, 255.0) as u8
    }

    /// Text scale including the pop-in ramp.
    pub fn scale(&self) -> f32 {
        let progress = self.timer.progress();
        let mut scale = if self.critical { CRITICAL_SCALE } else { 1.0 };
        if progress < POP_IN_FRACTION {
            scale *= progress / POP_IN_FRACTION;
        }
        scale
    }

    /// Current text color.
    pub fn color(&self) -> Rgba {
        let base = if self.critical { CRITICAL_COLOR } else { NORMAL_COLOR };
        base.with_alpha(self.alpha())
    }

    /// Outline on a 3x3 offset grid, then glow, then the main text.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let font_size = BASE_FONT_SIZE * self.scale();
        if font_size <= 0.0 {
            return;
        }

        let text = self.text();
        let color = self.color();
        let measured = surface.measure_text(&text, font_size);
        let origin = Vec2::new(
            self.position.x - measured.x / 2.0 + self.x_offset(),
            self.position.y + self.y_offset(),
        );

        let outline = Rgba::BLACK.with_alpha(color.a);
        for dx in -1..=1 {
            for dy in -1..=1 {
                surface.draw_text(&text, origin.offset(dx as f32, dy as f32), font_size, outline);
            }
        }

        let glow = GLOW_COLOR.with_alpha(color.a).scale_alpha(GLOW_ALPHA);
        surface.draw_text(&text, origin, font_size, glow);
        surface.draw_text(&text, origin, font_size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{CommandBuffer, DrawCommand};

    #[test]
    fn test_alpha_monotone_and_zero_at_completion() {
        let mut number = DamageNumberEffect::new(Vec2::default(), 20, false);
        let mut previous = number.alpha();
        assert_eq!(previous, 255);

        let mut ticks = 0;
        while !number.timer().is_complete() {
            number.update(0.05);
            ticks += 1;
            let alpha = number.alpha();
            assert!(alpha <= previous, "{} after {}", alpha, previous);
            previous = alpha;
        }

        assert_eq!(ticks, 20);
        assert_eq!(number.alpha(), 0);
    }

    #[test]
    fn test_rises_and_wobbles() {
        let mut number = DamageNumberEffect::new(Vec2::new(100.0, 100.0), 20, false);
        assert_eq!(number.y_offset(), 0.0);
        assert_eq!(number.x_offset(), 0.0);

        number.update(0.5);
        assert!((number.y_offset() + 30.0).abs() < 1e-4);
        assert!((number.x_offset() - 5.0f32.sin() * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_pop_in_scale() {
        let mut number = DamageNumberEffect::new(Vec2::default(), 20, false);
        assert_eq!(number.scale(), 0.0);

        number.update(0.1);
        assert!((number.scale() - 0.5).abs() < 1e-4);

        number.update(0.1);
        assert!((number.scale() - 1.0).abs() < 1e-4);

        let mut crit = DamageNumberEffect::new(Vec2::default(), 30, true);
        crit.update(0.5);
        assert_eq!(crit.scale(), 1.5);
    }

    #[test]
    fn test_critical_text_and_color() {
        let crit = DamageNumberEffect::new(Vec2::default(), 27, true);
        assert_eq!(crit.text(), "27!");
        assert_eq!(crit.color(), Rgba::new(255, 50, 50, 255));

        let normal = DamageNumberEffect::new(Vec2::default(), 27, false);
        assert_eq!(normal.text(), "27");
        assert_eq!(normal.color(), Rgba::new(255, 255, 200, 255));
    }

    #[test]
    fn test_nothing_drawn_at_zero_scale() {
        let number = DamageNumberEffect::new(Vec2::default(), 9, false);
        let mut buffer = CommandBuffer::new();
        number.draw(&mut buffer);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_draw_outline_glow_main() {
        let mut number = DamageNumberEffect::new(Vec2::new(200.0, 100.0), 18, false);
        number.update(0.5);

        let mut buffer = CommandBuffer::new();
        number.draw(&mut buffer);
        assert_eq!(buffer.len(), 11);

        let texts: Vec<(&str, Rgba)> = buffer.texts().collect();
        let alpha = number.alpha();
        assert!(texts[..9].iter().all(|(t, c)| *t == "18" && *c == Rgba::BLACK.with_alpha(alpha)));
        assert_eq!(texts[9].1, Rgba::new(255, 255, 200, alpha / 2));
        assert_eq!(texts[10].1, number.color());

        // Centered on the spawn point before wobble
        match &buffer.commands()[10] {
            DrawCommand::Text { origin, font_size, .. } => {
                let width = buffer.measure_text("18", *font_size).x;
                let expected_x = 200.0 - width / 2.0 + number.x_offset();
                assert!((origin.x - expected_x).abs() < 1e-4);
                assert!((origin.y - 70.0).abs() < 1e-4);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
