//! Drawing Surface
//!
//! The opaque sink effects draw into. A windowed host implements
//! [`Surface`] over its graphics context; headless hosts and tests use
//! [`CommandBuffer`], which records the calls.

use serde::{Serialize, Deserialize};

use crate::core::color::Rgba;
use crate::core::vec2::Vec2;

/// Approximate glyph advance as a fraction of font size (for measuring).
pub const GLYPH_WIDTH_FACTOR: f32 = 0.6;

/// Drawing primitives effects need.
pub trait Surface {
    /// Stroke straight lines from `center` to each endpoint.
    fn stroke_rays(&mut self, center: Vec2, endpoints: &[Vec2], color: Rgba, width: f32);

    /// Fill the polygon through `points`.
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Draw bold text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Vec2, font_size: f32, color: Rgba);

    /// Rendered size of `text` at `font_size`.
    fn measure_text(&self, text: &str, font_size: f32) -> Vec2;
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// See [`Surface::stroke_rays`]
    StrokeRays {
        center: Vec2,
        endpoints: Vec<Vec2>,
        color: Rgba,
        width: f32,
    },
    /// See [`Surface::fill_polygon`]
    FillPolygon {
        points: Vec<Vec2>,
        color: Rgba,
    },
    /// See [`Surface::draw_text`]
    Text {
        text: String,
        origin: Vec2,
        font_size: f32,
        color: Rgba,
    },
}

/// Surface that records commands instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// No commands recorded?
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take the recorded frame, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Recorded text commands only.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Rgba)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, color, .. } => Some((text.as_str(), *color)),
            _ => None,
        })
    }
}

impl Surface for CommandBuffer {
    fn stroke_rays(&mut self, center: Vec2, endpoints: &[Vec2], color: Rgba, width: f32) {
        self.commands.push(DrawCommand::StrokeRays {
            center,
            endpoints: endpoints.to_vec(),
            color,
            width,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Vec2, font_size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            font_size,
            color,
        });
    }

    fn measure_text(&self, text: &str, font_size: f32) -> Vec2 {
        Vec2::new(
            text.chars().count() as f32 * font_size * GLYPH_WIDTH_FACTOR,
            font_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut buffer = CommandBuffer::new();
        buffer.fill_polygon(&[Vec2::default(), Vec2::new(1.0, 0.0)], Rgba::WHITE);
        buffer.draw_text("12", Vec2::new(5.0, 5.0), 16.0, Rgba::BLACK);

        assert_eq!(buffer.len(), 2);
        assert!(matches!(buffer.commands()[0], DrawCommand::FillPolygon { .. }));
        assert_eq!(buffer.texts().collect::<Vec<_>>(), vec![("12", Rgba::BLACK)]);

        let frame = buffer.take();
        assert_eq!(frame.len(), 2);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_measure_text() {
        let buffer = CommandBuffer::new();
        let size = buffer.measure_text("27!", 20.0);
        assert_eq!(size, Vec2::new(36.0, 20.0));
    }
}
