//! Math utilities and types
//!
//! Screen-space 2D types used by entity transforms and the visibility test.
//! Coordinates follow the window convention: origin top-left, Y down.

pub use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 2D transform: position, rotation (radians) and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Position in screen space
    pub position: Vec2,

    /// Rotation in radians, clockwise on screen
    pub rotation: f32,

    /// Scale factors
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
        }
    }
}

impl Transform2D {
    /// Create a transform with only position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform at `(x, y)`
    pub fn at(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Builder pattern: set scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    /// Move by `delta`
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builders_keep_other_fields() {
        let t = Transform2D::at(10.0, 5.0).with_scale(Vec2::new(2.0, 0.5));
        assert_relative_eq!(t.position.x, 10.0);
        assert_relative_eq!(t.position.y, 5.0);
        assert_relative_eq!(t.scale.y, 0.5);
        assert_relative_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform2D::default();
        t.translate(Vec2::new(3.0, -1.0));
        assert_eq!(t.position, Vec2::new(3.0, -1.0));
    }
}
