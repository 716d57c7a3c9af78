//! # Rendering
//!
//! Everything between the scene and the graphics backend:
//!
//! - [`commands`]: draw commands and the [`Canvas`] renderer handle
//! - [`surface`]: the [`RenderSurface`] capability components expose
//! - [`order`]: priority ordering of the surface registry
//! - [`visibility`]: viewport containment and enter/exit transitions
//!
//! [`render_frame`] is the render stage of the engine loop.

pub mod commands;
pub mod order;
pub mod surface;
pub mod visibility;

pub use commands::{Canvas, Color, CommandList, DrawCommand};
pub use order::selection_sort_by_priority;
pub use surface::RenderSurface;
pub use visibility::{update_visibility, ViewportQuad, VisibilityChange};

use crate::backend::GraphicsBackend;
use crate::ecs::Scene;

/// Draw one frame
///
/// Clears the backend, then walks the surfaces in priority order. Each
/// surface is first classified against the viewport grown by `leeway`,
/// firing its owner's visibility hook on a transition, and then drawn.
/// Every surface draws, whether or not it is in view. Finally the frame is
/// presented.
pub fn render_frame(scene: &mut Scene, graphics: &mut dyn GraphicsBackend, leeway: f32) {
    graphics.clear();

    let (width, height) = scene.viewport_size();
    let quad = ViewportQuad::from_viewport(width, height, leeway);

    for id in scene.render_order() {
        let Some(owner) = scene.component_owner(id) else {
            continue;
        };
        let Some(transform) = scene.transform(owner).copied() else {
            continue;
        };

        let inside = quad.contains(transform.position);
        let change = scene
            .components
            .get_mut(id)
            .and_then(|record| record.surface.as_mut())
            .and_then(|surface| update_visibility(&mut surface.visible, inside));

        match change {
            Some(VisibilityChange::BecameVisible) => {
                scene.with_entity(owner, |entity, ctx| entity.on_became_visible(ctx));
            }
            Some(VisibilityChange::BecameHidden) => {
                scene.with_entity(owner, |entity, ctx| entity.on_became_hidden(ctx));
            }
            None => {}
        }

        // Hooks may have moved the owner
        let transform = scene.transform(owner).copied().unwrap_or(transform);
        scene.with_component(id, |component, _| {
            if let Some(surface) = component.as_render_surface() {
                surface.draw(&transform, graphics.canvas());
            }
        });
    }

    graphics.present();
}
