//! Render surface capability

use super::commands::Canvas;
use crate::foundation::math::Transform2D;

/// Drawable capability of a component
///
/// The engine owns the visibility flag and the registry position; the
/// surface only reports its initial priority and draws itself.
pub trait RenderSurface {
    /// Priority used when the surface is registered; lower draws first
    fn render_priority(&self) -> i32 {
        0
    }

    /// Emit draw commands for this frame
    ///
    /// `transform` is the owning entity's transform.
    fn draw(&mut self, transform: &Transform2D, canvas: &mut dyn Canvas);
}
