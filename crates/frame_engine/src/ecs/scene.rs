//! Scene: entity and component arenas plus the three registries
//!
//! The scene is the single owner of every entity and component. Gameplay
//! code reaches it through the `&mut Scene` passed to world-root hooks and
//! through [`EntityCtx::scene`] inside entity and component hooks.
//!
//! Three registries order what the loop visits:
//! - entities, in spawn order, for updates
//! - render surfaces, by ascending priority, for drawing
//! - controllable actors, in registration order, for input routing
//!
//! Nothing is removed from a registry while a frame is in flight; removal
//! only happens in the end-of-frame drain.

use slotmap::SlotMap;

use super::component::{Component, ComponentId, ComponentRecord, SurfaceState};
use super::counter::InstanceCounter;
use super::entity::{Entity, EntityCtx, EntityId, EntityRecord};
use super::lifecycle::PendingDestroyQueue;
use crate::foundation::collections::Registry;
use crate::foundation::math::Transform2D;
use crate::input::{InputEvent, InputState};
use crate::render::order::selection_sort_by_priority;
use crate::timers::TimerManager;

/// Entry of the controllable-actor registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorRef {
    /// An entity whose `as_controllable` returned `Some`
    Entity(EntityId),
    /// A component whose `as_controllable` returned `Some`
    Component(ComponentId),
}

/// Owner of all live entities and components
pub struct Scene {
    pub(crate) entities: SlotMap<EntityId, EntityRecord>,
    pub(crate) components: SlotMap<ComponentId, ComponentRecord>,
    pub(crate) entity_registry: Registry<EntityId>,
    pub(crate) surface_registry: Registry<ComponentId>,
    pub(crate) actor_registry: Registry<ActorRef>,
    pub(crate) pending: PendingDestroyQueue,
    pub(crate) counter: InstanceCounter,
    input: InputState,
    timers: TimerManager,
    viewport: (u32, u32),
    quit_requested: bool,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self {
            entities: SlotMap::with_key(),
            components: SlotMap::with_key(),
            entity_registry: Registry::new(),
            surface_registry: Registry::new(),
            actor_registry: Registry::new(),
            pending: PendingDestroyQueue::new(),
            counter: InstanceCounter::new(),
            input: InputState::new(),
            timers: TimerManager::new(),
            viewport: (0, 0),
            quit_requested: false,
        }
    }

    /// Add an entity and register it
    ///
    /// The entity is appended to the entity registry, so when spawned from
    /// inside an update it is updated later in the same pass.
    pub fn spawn(&mut self, entity: impl Entity, transform: Transform2D) -> EntityId {
        self.spawn_boxed(Box::new(entity), transform)
    }

    /// Add an already boxed entity and register it
    pub fn spawn_boxed(&mut self, mut entity: Box<dyn Entity>, transform: Transform2D) -> EntityId {
        let controllable = entity.as_controllable().is_some();
        let id = self.entities.insert(EntityRecord::new(entity, transform));
        self.entity_registry.push(id);
        self.counter.add_object();
        if controllable {
            self.actor_registry.push(ActorRef::Entity(id));
        }
        log::debug!("Spawned {} ({id:?})", self.entity_name(id).unwrap_or("entity"));
        id
    }

    /// Attach a component to a live entity
    ///
    /// Render surfaces and controllables are registered immediately; adding a
    /// surface re-sorts the render order. Returns `None` when `owner` does not
    /// resolve.
    pub fn attach(&mut self, owner: EntityId, component: impl Component) -> Option<ComponentId> {
        self.attach_boxed(owner, Box::new(component))
    }

    /// Attach an already boxed component
    pub fn attach_boxed(&mut self, owner: EntityId, mut component: Box<dyn Component>) -> Option<ComponentId> {
        if !self.entities.contains_key(owner) {
            log::warn!("attach: owner {owner:?} is not alive");
            return None;
        }

        let surface = component.as_render_surface().map(|s| SurfaceState {
            priority: s.render_priority(),
            visible: false,
        });
        let actor = component.as_controllable().is_some();

        let id = self.components.insert(ComponentRecord {
            owner,
            behavior: Some(component),
            surface,
            actor,
        });
        if let Some(record) = self.entities.get_mut(owner) {
            record.components.push(id);
        }
        self.counter.add_component();

        if surface.is_some() {
            self.surface_registry.push(id);
            self.sort_render_order();
        }
        if actor {
            self.actor_registry.push(ActorRef::Component(id));
        }
        Some(id)
    }

    /// Whether `id` resolves to an entity that has not been drained yet
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Whether `id` is queued for end-of-frame destruction
    pub fn is_pending_destroy(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|r| r.pending_destroy)
    }

    /// Whether `id` resolves to a component that has not been released yet
    pub fn component_alive(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Type name of the entity, as reported by [`Entity::name`]
    pub fn entity_name(&self, id: EntityId) -> Option<&str> {
        self.entities.get(id).map(|r| r.name.as_str())
    }

    /// Entity transform
    pub fn transform(&self, id: EntityId) -> Option<&Transform2D> {
        self.entities.get(id).map(|r| &r.transform)
    }

    /// Mutable entity transform
    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform2D> {
        self.entities.get_mut(id).map(|r| &mut r.transform)
    }

    /// Components owned by `id`, in attachment order
    pub fn components_of(&self, id: EntityId) -> &[ComponentId] {
        match self.entities.get(id) {
            Some(record) => &record.components,
            None => &[],
        }
    }

    /// Owner of a component
    pub fn component_owner(&self, id: ComponentId) -> Option<EntityId> {
        self.components.get(id).map(|r| r.owner)
    }

    /// Render priority of a surface component
    pub fn render_priority(&self, id: ComponentId) -> Option<i32> {
        self.components.get(id)?.surface.map(|s| s.priority)
    }

    /// Visibility flag of a surface component
    pub fn is_visible(&self, id: ComponentId) -> Option<bool> {
        self.components.get(id)?.surface.map(|s| s.visible)
    }

    /// Change a surface's priority and re-sort the render order
    pub fn set_render_priority(&mut self, id: ComponentId, priority: i32) -> bool {
        let Some(surface) = self.components.get_mut(id).and_then(|r| r.surface.as_mut()) else {
            return false;
        };
        if surface.priority != priority {
            surface.priority = priority;
            self.sort_render_order();
        }
        true
    }

    /// Live entities in update order
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entity_registry.snapshot()
    }

    /// Surface components in draw order
    pub fn render_order(&self) -> Vec<ComponentId> {
        self.surface_registry.snapshot()
    }

    /// Registered actors in routing order
    pub fn actors(&self) -> Vec<ActorRef> {
        self.actor_registry.snapshot()
    }

    /// Number of registered entities
    pub fn entity_count(&self) -> usize {
        self.entity_registry.len()
    }

    /// Number of live components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Live object / component counters
    pub fn instance_counter(&self) -> &InstanceCounter {
        &self.counter
    }

    /// Input snapshot, updated before actors see each event
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Scheduled callbacks
    pub fn timers_mut(&mut self) -> &mut TimerManager {
        &mut self.timers
    }

    /// Drawable size reported by the graphics backend this frame
    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }

    /// Ask the loop to stop at the next input step
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub(crate) fn take_quit_request(&mut self) -> bool {
        std::mem::take(&mut self.quit_requested)
    }

    pub(crate) fn set_viewport(&mut self, size: (u32, u32)) {
        self.viewport = size;
    }

    pub(crate) fn sort_render_order(&mut self) {
        let components = &self.components;
        selection_sort_by_priority(self.surface_registry.as_mut_slice(), |id| {
            components
                .get(*id)
                .and_then(|r| r.surface)
                .map_or(i32::MAX, |s| s.priority)
        });
    }

    /// Run `f` on an entity's behavior with a context for that entity
    ///
    /// The behavior is taken out of its slot for the duration of the call, so
    /// `f` may freely mutate the scene. Returns `None` when the entity does
    /// not resolve or its behavior is already running further up the stack.
    pub(crate) fn with_entity<R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut dyn Entity, &mut EntityCtx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.entities.get_mut(id)?.behavior.take()?;
        let result = {
            let mut ctx = EntityCtx::new(self, id, None);
            f(behavior.as_mut(), &mut ctx)
        };
        if let Some(record) = self.entities.get_mut(id) {
            record.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Component counterpart of [`Scene::with_entity`]
    pub(crate) fn with_component<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Component, &mut EntityCtx<'_>) -> R,
    ) -> Option<R> {
        let record = self.components.get_mut(id)?;
        let owner = record.owner;
        let mut behavior = record.behavior.take()?;
        let result = {
            let mut ctx = EntityCtx::new(self, owner, Some(id));
            f(behavior.as_mut(), &mut ctx)
        };
        if let Some(record) = self.components.get_mut(id) {
            record.behavior = Some(behavior);
        }
        Some(result)
    }

    /// Update every live entity, each followed by its components
    ///
    /// Entities spawned during the pass are visited in the same pass;
    /// components attached during an entity's turn wait for the next frame.
    pub(crate) fn update_entities(&mut self, delta_time: f32) {
        let mut index = 0;
        while let Some(id) = self.entity_registry.get(index) {
            index += 1;
            if self.with_entity(id, |entity, ctx| entity.update(ctx, delta_time)).is_none() {
                continue;
            }
            for component in self.components_of(id).to_vec() {
                self.with_component(component, |c, ctx| c.update(ctx, delta_time));
            }
        }
    }

    /// Fold `event` into the input state, then hand it to every actor
    pub(crate) fn dispatch_input(&mut self, event: &InputEvent) {
        self.input.apply(event);

        let mut index = 0;
        while let Some(actor) = self.actor_registry.get(index) {
            index += 1;
            match actor {
                ActorRef::Entity(id) => {
                    self.with_entity(id, |entity, ctx| {
                        if let Some(controllable) = entity.as_controllable() {
                            controllable.handle_event(ctx, event);
                        }
                    });
                }
                ActorRef::Component(id) => {
                    self.with_component(id, |component, ctx| {
                        if let Some(controllable) = component.as_controllable() {
                            controllable.handle_event(ctx, event);
                        }
                    });
                }
            }
        }
    }

    /// Fire due timers
    ///
    /// Callbacks get the whole scene, including the timer manager, so they
    /// may schedule or cancel timers themselves.
    pub(crate) fn advance_timers(&mut self, elapsed: std::time::Duration) {
        for handle in self.timers.advance_all(elapsed) {
            let Some(mut callback) = self.timers.take_callback(handle) else {
                continue;
            };
            callback(&mut *self);
            self.timers.finish(handle, callback);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::input::{Controllable, KeyCode};
    use crate::render::{Canvas, RenderSurface};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Walker {
        tag: &'static str,
        log: Log,
    }

    impl Entity for Walker {
        fn update(&mut self, ctx: &mut EntityCtx<'_>, _dt: f32) {
            self.log.borrow_mut().push(format!("update {}", self.tag));
            if let Some(t) = ctx.transform_mut() {
                t.translate(Vec2::new(1.0, 0.0));
            }
        }
    }

    struct Spawner {
        log: Log,
        spawned: bool,
    }

    impl Entity for Spawner {
        fn update(&mut self, ctx: &mut EntityCtx<'_>, _dt: f32) {
            self.log.borrow_mut().push("update spawner".to_string());
            if !self.spawned {
                self.spawned = true;
                let log = self.log.clone();
                ctx.scene.spawn(Walker { tag: "child", log }, Transform2D::default());
            }
        }
    }

    struct Ticker {
        log: Log,
    }

    impl Component for Ticker {
        fn update(&mut self, ctx: &mut EntityCtx<'_>, _dt: f32) {
            assert!(ctx.component().is_some());
            self.log.borrow_mut().push("update ticker".to_string());
        }
    }

    struct Sprite {
        priority: i32,
    }

    impl RenderSurface for Sprite {
        fn render_priority(&self) -> i32 {
            self.priority
        }

        fn draw(&mut self, _transform: &Transform2D, _canvas: &mut dyn Canvas) {}
    }

    impl Component for Sprite {
        fn as_render_surface(&mut self) -> Option<&mut dyn RenderSurface> {
            Some(self)
        }
    }

    struct KeyListener {
        seen: Rc<RefCell<Vec<InputEvent>>>,
        held_w: Rc<RefCell<bool>>,
    }

    impl Controllable for KeyListener {
        fn handle_event(&mut self, ctx: &mut EntityCtx<'_>, event: &InputEvent) {
            self.seen.borrow_mut().push(event.clone());
            *self.held_w.borrow_mut() = ctx.scene.input().is_key_down(KeyCode::W);
        }
    }

    impl Component for KeyListener {
        fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
            Some(self)
        }
    }

    struct Plain;

    impl Entity for Plain {}

    #[test]
    fn test_spawn_registers_and_counts() {
        let mut scene = Scene::new();
        let id = scene.spawn(Plain, Transform2D::at(1.0, 2.0));
        assert!(scene.is_alive(id));
        assert_eq!(scene.entity_ids(), vec![id]);
        assert_eq!(scene.instance_counter().live_objects(), 1);
        assert_eq!(scene.transform(id).map(|t| t.position), Some(Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn test_update_order_entity_then_components() {
        let log: Log = Rc::default();
        let mut scene = Scene::new();
        let a = scene.spawn(Walker { tag: "a", log: log.clone() }, Transform2D::default());
        scene.attach(a, Ticker { log: log.clone() });
        scene.spawn(Walker { tag: "b", log: log.clone() }, Transform2D::default());

        scene.update_entities(0.016);

        assert_eq!(*log.borrow(), vec!["update a", "update ticker", "update b"]);
        assert_eq!(scene.transform(a).map(|t| t.position.x), Some(1.0));
    }

    #[test]
    fn test_entities_spawned_mid_update_run_same_pass() {
        let log: Log = Rc::default();
        let mut scene = Scene::new();
        scene.spawn(Spawner { log: log.clone(), spawned: false }, Transform2D::default());

        scene.update_entities(0.016);

        assert_eq!(*log.borrow(), vec!["update spawner", "update child"]);
        assert_eq!(scene.entity_count(), 2);
    }

    #[test]
    fn test_surfaces_sorted_on_attach() {
        let mut scene = Scene::new();
        let owner = scene.spawn(Plain, Transform2D::default());
        let p5 = scene.attach(owner, Sprite { priority: 5 }).unwrap();
        let p1 = scene.attach(owner, Sprite { priority: 1 }).unwrap();
        let p3 = scene.attach(owner, Sprite { priority: 3 }).unwrap();

        assert_eq!(scene.render_order(), vec![p1, p3, p5]);

        assert!(scene.set_render_priority(p5, -1));
        assert_eq!(scene.render_order(), vec![p5, p1, p3]);
    }

    #[test]
    fn test_single_surface_insert_is_safe() {
        let mut scene = Scene::new();
        let owner = scene.spawn(Plain, Transform2D::default());
        let only = scene.attach(owner, Sprite { priority: 9 }).unwrap();
        assert_eq!(scene.render_order(), vec![only]);
        assert_eq!(scene.is_visible(only), Some(false));
    }

    #[test]
    fn test_attach_to_dead_owner_fails() {
        let mut scene = Scene::new();
        let owner = scene.spawn(Plain, Transform2D::default());
        scene.mark_for_destruction(owner);
        scene.drain_pending();
        assert!(scene.attach(owner, Sprite { priority: 0 }).is_none());
        assert_eq!(scene.component_count(), 0);
    }

    #[test]
    fn test_input_reaches_actors_after_state_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let held_w = Rc::new(RefCell::new(false));
        let mut scene = Scene::new();
        let owner = scene.spawn(Plain, Transform2D::default());
        scene.attach(owner, KeyListener { seen: seen.clone(), held_w: held_w.clone() });
        assert_eq!(scene.actors().len(), 1);

        let event = InputEvent::Key { key: KeyCode::W, pressed: true };
        scene.dispatch_input(&event);

        assert_eq!(*seen.borrow(), vec![event]);
        assert!(*held_w.borrow());
    }

    #[test]
    fn test_timers_fire_with_scene_access() {
        let mut scene = Scene::new();
        scene.timers_mut().schedule_once(std::time::Duration::from_millis(10), |scene| {
            scene.spawn(Plain, Transform2D::default());
        });

        scene.advance_timers(std::time::Duration::from_millis(5));
        assert_eq!(scene.entity_count(), 0);
        scene.advance_timers(std::time::Duration::from_millis(5));
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.timers_mut().is_empty());
    }
}
