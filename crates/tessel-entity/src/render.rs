//! The renderer boundary.
//!
//! Entities and systems describe what to draw through [`Renderer`]; they never
//! touch a device. Rasterization lives behind the trait in the host
//! application. [`RecordingRenderer`] captures calls as [`DrawCommand`]s for
//! headless runs and tests.

use serde::{Deserialize, Serialize};

use crate::body::Vec2;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// White.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Hitbox overlay green.
    pub const HITBOX: Color = Color::rgb(64, 224, 96);
    /// Hitbox overlay for solid bodies.
    pub const HITBOX_SOLID: Color = Color::rgb(224, 96, 64);
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Draw calls the core is allowed to make.
pub trait Renderer {
    /// Draw frame `frame` of `sprite` with its top-left at `position`.
    fn draw_sprite(&mut self, sprite: &str, frame: u32, position: Vec2, flip_x: bool);

    /// Draw a rectangle outline (`filled == false`) or a filled rectangle.
    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color, filled: bool);

    /// Draw a line of text in screen space.
    fn draw_text(&mut self, text: &str, position: Vec2, color: Color);
}

// ---------------------------------------------------------------------------
// DrawCommand / RecordingRenderer
// ---------------------------------------------------------------------------

/// A captured renderer call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// See [`Renderer::draw_sprite`].
    Sprite {
        /// Sprite key.
        sprite: String,
        /// Frame index.
        frame: u32,
        /// Top-left corner.
        position: Vec2,
        /// Mirrored horizontally.
        flip_x: bool,
    },
    /// See [`Renderer::draw_rect`].
    Rect {
        /// Top-left corner.
        position: Vec2,
        /// Extent.
        size: Vec2,
        /// Color.
        color: Color,
        /// Filled or outline.
        filled: bool,
    },
    /// See [`Renderer::draw_text`].
    Text {
        /// Text.
        text: String,
        /// Screen position.
        position: Vec2,
        /// Color.
        color: Color,
    },
}

/// Headless renderer that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// Calls since the last [`clear`](Self::clear).
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprite keys drawn, in order.
    pub fn sprites(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { sprite, .. } => Some(sprite.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_sprite(&mut self, sprite: &str, frame: u32, position: Vec2, flip_x: bool) {
        self.commands.push(DrawCommand::Sprite {
            sprite: sprite.to_owned(),
            frame,
            position,
            flip_x,
        });
    }

    fn draw_rect(&mut self, position: Vec2, size: Vec2, color: Color, filled: bool) {
        self.commands.push(DrawCommand::Rect {
            position,
            size,
            color,
            filled,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            color,
        });
    }
}
