//! Entity implementation
//!
//! An entity is a slot in the scene arena holding a transform, the keys of
//! the components it owns, and the gameplay object that reacts to engine
//! callbacks.

use slotmap::new_key_type;

use super::component::ComponentId;
use super::scene::Scene;
use crate::foundation::math::Transform2D;
use crate::input::Controllable;

new_key_type! {
    /// Entity identifier
    ///
    /// Keys are generational: once an entity has been drained its key never
    /// resolves again, even if the slot is reused.
    pub struct EntityId;
}

/// Gameplay object driven by the engine loop
///
/// Every hook has an empty default so implementors only override what they
/// need.
pub trait Entity: 'static {
    /// Name used in lifecycle logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per frame after the world root has updated
    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_time: f32) {
        let _ = (ctx, delta_time);
    }

    /// Called exactly once, after all of the entity's components have been
    /// finalized and before the entity leaves the registries
    fn on_destroyed(&mut self, ctx: &mut EntityCtx<'_>) {
        let _ = ctx;
    }

    /// One of the entity's render surfaces entered the viewport
    fn on_became_visible(&mut self, ctx: &mut EntityCtx<'_>) {
        let _ = ctx;
    }

    /// One of the entity's render surfaces left the viewport
    fn on_became_hidden(&mut self, ctx: &mut EntityCtx<'_>) {
        let _ = ctx;
    }

    /// Input hook; entities returning `Some` are registered as actors on spawn
    fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
        None
    }
}

/// Arena slot backing one entity
pub(crate) struct EntityRecord {
    /// Taken out while one of its hooks runs
    pub(crate) behavior: Option<Box<dyn Entity>>,
    pub(crate) name: String,
    pub(crate) transform: Transform2D,
    /// Attachment order
    pub(crate) components: Vec<ComponentId>,
    pub(crate) pending_destroy: bool,
}

impl EntityRecord {
    pub(crate) fn new(behavior: Box<dyn Entity>, transform: Transform2D) -> Self {
        let name = behavior.name().to_string();
        Self {
            behavior: Some(behavior),
            name,
            transform,
            components: Vec::new(),
            pending_destroy: false,
        }
    }
}

/// Context handed to entity and component hooks
///
/// Gives the hook its own identity plus full access to the scene so it can
/// spawn, attach, move things, or mark entities for destruction. Removal is
/// always deferred to the end-of-frame drain, so anything reachable from here
/// stays valid for the rest of the frame.
pub struct EntityCtx<'a> {
    /// Scene the hook runs in
    pub scene: &'a mut Scene,
    entity: EntityId,
    component: Option<ComponentId>,
}

impl<'a> EntityCtx<'a> {
    pub(crate) fn new(scene: &'a mut Scene, entity: EntityId, component: Option<ComponentId>) -> Self {
        Self {
            scene,
            entity,
            component,
        }
    }

    /// Entity the hook belongs to (the owner, for component hooks)
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Component running the hook, if this is a component hook
    pub fn component(&self) -> Option<ComponentId> {
        self.component
    }

    /// Copy of the entity's transform
    pub fn transform(&self) -> Transform2D {
        self.scene.transform(self.entity).copied().unwrap_or_default()
    }

    /// Mutable access to the entity's transform
    pub fn transform_mut(&mut self) -> Option<&mut Transform2D> {
        self.scene.transform_mut(self.entity)
    }

    /// Queue the entity for end-of-frame destruction
    pub fn destroy_self(&mut self) -> bool {
        self.scene.mark_for_destruction(self.entity)
    }
}
