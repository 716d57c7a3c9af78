//! Component trait and arena slot

use slotmap::new_key_type;

use super::entity::{EntityCtx, EntityId};
use crate::input::Controllable;
use crate::render::RenderSurface;

new_key_type! {
    /// Component identifier
    pub struct ComponentId;
}

/// Behavior unit attached to exactly one entity
pub trait Component: 'static {
    /// Called once per frame, right after the owning entity's update
    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_time: f32) {
        let _ = (ctx, delta_time);
    }

    /// Called exactly once before the component is released
    fn on_destroyed(&mut self, ctx: &mut EntityCtx<'_>) {
        let _ = ctx;
    }

    /// Drawing hook; components returning `Some` join the render registry
    fn as_render_surface(&mut self) -> Option<&mut dyn RenderSurface> {
        None
    }

    /// Input hook; components returning `Some` join the actor registry
    fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
        None
    }
}

/// Render bookkeeping for surface components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SurfaceState {
    pub(crate) priority: i32,
    pub(crate) visible: bool,
}

/// Arena slot backing one component
pub(crate) struct ComponentRecord {
    pub(crate) owner: EntityId,
    /// Taken out while one of its hooks runs
    pub(crate) behavior: Option<Box<dyn Component>>,
    pub(crate) surface: Option<SurfaceState>,
    pub(crate) actor: bool,
}
