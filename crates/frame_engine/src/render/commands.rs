//! Draw commands for the renderer handle
//!
//! Render surfaces do not talk to a graphics API. They describe what to draw
//! as [`DrawCommand`]s and push them into the [`Canvas`] exposed by the
//! graphics backend, which is free to rasterize, batch or simply record them.

use crate::foundation::math::Vec2;

/// RGBA color, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Opaque color from RGB
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// A single drawing instruction in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled axis-aligned rectangle centered on `center`
    Rect {
        /// Center point
        center: Vec2,
        /// Full width and height
        size: Vec2,
        /// Fill color
        color: Color,
    },

    /// Textured quad; `texture` names a backend-owned image
    Sprite {
        /// Texture name
        texture: String,
        /// Center point
        center: Vec2,
        /// Full width and height
        size: Vec2,
        /// Rotation in radians
        rotation: f32,
    },

    /// Text anchored at its top-left corner
    Text {
        /// Text content
        text: String,
        /// Top-left corner
        position: Vec2,
        /// Text color
        color: Color,
    },
}

/// Renderer handle exposed by the graphics backend
pub trait Canvas {
    /// Queue a command for the frame being built
    fn submit(&mut self, command: DrawCommand);
}

/// Canvas that keeps every command in submission order
#[derive(Debug, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands submitted so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop all commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Move the commands out, leaving the list empty
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas for CommandList {
    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
