//! RGBA colors for effect rendering.

use serde::{Serialize, Deserialize};

/// 8-bit-per-channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha (255 = opaque)
    pub a: u8,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Create from all four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Same color with alpha multiplied by `factor` (truncated).
    #[inline]
    pub fn scale_alpha(self, factor: f32) -> Self {
        self.with_alpha(scale_channel(self.a, factor))
    }

    /// Per-channel linear interpolation (alpha included).
    ///
    /// `progress` is clamped to `[0, 1]`; channels truncate toward zero.
    pub fn lerp(start: Self, end: Self, progress: f32) -> Self {
        let t = progress.clamp(0.0, 1.0);
        Self::new(
            lerp_channel(start.r, end.r, t),
            lerp_channel(start.g, end.g, t),
            lerp_channel(start.b, end.b, t),
            lerp_channel(start.a, end.a, t),
        )
    }
}

#[inline]
fn lerp_channel(start: u8, end: u8, t: f32) -> u8 {
    let value = start as f32 + (end as f32 - start as f32) * t;
    value.clamp(0.0, 255.0) as u8
}

#[inline]
fn scale_channel(channel: u8, factor: f32) -> u8 {
    (channel as f32 * factor.max(0.0)).clamp(0.0, 255.0) as u8
}
