//! Deferred destruction
//!
//! Entities are never removed mid-frame. Marking one queues it; the queue is
//! drained once per frame after rendering, and once more at shutdown.
//!
//! Drain order for each entity:
//! 1. every component, in attachment order: `on_destroyed`, then removal
//!    from the surface and actor registries, then the counter decrement
//! 2. the entity's own `on_destroyed`
//! 3. removal from the entity and actor registries, then the slot itself
//!
//! Hooks may mark further entities while the drain runs; those are appended
//! to the queue and destroyed in the same drain. An entity whose hook, or
//! one of whose components' hooks, is still on the stack is left queued for
//! the next drain.

use std::collections::VecDeque;

use super::component::ComponentId;
use super::entity::EntityId;
use super::scene::{ActorRef, Scene};

/// FIFO of entities awaiting destruction
#[derive(Debug, Default)]
pub(crate) struct PendingDestroyQueue {
    queue: VecDeque<EntityId>,
}

impl PendingDestroyQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, id: EntityId) {
        self.queue.push_back(id);
    }

    pub(crate) fn pop(&mut self) -> Option<EntityId> {
        self.queue.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }
}

impl Scene {
    /// Queue an entity for destruction at the end of the frame
    ///
    /// Returns `true` when this call queued it. Marking an entity that is
    /// already queued, or no longer alive, does nothing and returns `false`.
    pub fn mark_for_destruction(&mut self, id: EntityId) -> bool {
        let Some(record) = self.entities.get_mut(id) else {
            return false;
        };
        if record.pending_destroy {
            log::debug!("{id:?} already marked for destruction");
            return false;
        }
        record.pending_destroy = true;
        self.pending.push(id);
        true
    }

    /// Queue every live entity, in registry order
    pub(crate) fn mark_all_for_destruction(&mut self) -> usize {
        self.entity_ids()
            .into_iter()
            .filter(|id| self.mark_for_destruction(*id))
            .count()
    }

    /// Number of entities waiting for the next drain
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Destroy everything queued, including entities queued by the hooks
    /// that run during this drain. Returns how many entities were destroyed.
    pub(crate) fn drain_pending(&mut self) -> usize {
        let mut destroyed = 0;
        let mut busy = Vec::new();
        while let Some(id) = self.pending.pop() {
            if self.is_busy(id) {
                busy.push(id);
            } else if self.destroy_entity(id) {
                destroyed += 1;
            }
        }
        if !busy.is_empty() {
            log::warn!("{} entities are mid-hook; destruction deferred", busy.len());
            for id in busy {
                self.pending.push(id);
            }
        }
        if destroyed > 0 {
            log::debug!("Drained {destroyed} entities");
        }
        destroyed
    }

    /// Mark and drain until the scene is empty
    ///
    /// `on_destroyed` hooks may spawn replacements, so one pass is not always
    /// enough. Gives up after `max_passes` and returns whether the scene
    /// ended empty.
    pub(crate) fn destroy_all(&mut self, max_passes: usize) -> bool {
        for pass in 1..=max_passes {
            if self.entity_registry.is_empty() {
                return true;
            }
            if pass > 1 {
                log::debug!(
                    "Teardown pass {pass}: {} entities spawned during the last drain",
                    self.entity_registry.len()
                );
            }
            self.mark_all_for_destruction();
            self.drain_pending();
        }
        if self.entity_registry.is_empty() {
            return true;
        }
        log::warn!(
            "Teardown gave up after {max_passes} passes with {} entities left",
            self.entity_registry.len()
        );
        false
    }

    /// Whether a hook of the entity or one of its components is running
    fn is_busy(&self, id: EntityId) -> bool {
        let Some(record) = self.entities.get(id) else {
            return false;
        };
        record.behavior.is_none()
            || record
                .components
                .iter()
                .any(|c| self.components.get(*c).is_some_and(|r| r.behavior.is_none()))
    }

    fn destroy_entity(&mut self, id: EntityId) -> bool {
        let Some(components) = self.entities.get(id).map(|r| r.components.clone()) else {
            return false;
        };

        for component in components {
            self.release_component(component);
        }

        self.with_entity(id, |entity, ctx| entity.on_destroyed(ctx));

        // Attached from inside a destruction hook
        let late = self.components_of(id).to_vec();
        for component in late {
            self.release_component(component);
        }

        if self.entity_registry.remove(id) {
            self.counter.remove_object();
        }
        self.actor_registry.remove(ActorRef::Entity(id));
        if let Some(record) = self.entities.remove(id) {
            log::debug!("Destroyed {} ({id:?})", record.name);
        }
        true
    }

    fn release_component(&mut self, id: ComponentId) {
        self.with_component(id, |component, ctx| component.on_destroyed(ctx));

        let Some(record) = self.components.remove(id) else {
            return;
        };
        if record.surface.is_some() && self.surface_registry.remove(id) {
            self.sort_render_order();
        }
        if record.actor {
            self.actor_registry.remove(ActorRef::Component(id));
        }
        if let Some(owner) = self.entities.get_mut(record.owner) {
            owner.components.retain(|c| *c != id);
        }
        self.counter.remove_component();
    }
}
