//! Whole-loop tests against the headless backends

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::backend::headless::{HeadlessWindow, PresentedFrames, ScriptedInput};
use crate::backend::WindowFlags;
use crate::core::EngineConfig;
use crate::ecs::{Component, Entity, EntityCtx, Scene};
use crate::foundation::math::{Transform2D, Vec2};
use crate::input::{Controllable, InputEvent, KeyCode};
use crate::physics::NullPhysics;
use crate::render::{Canvas, Color, DrawCommand, RenderSurface};
use crate::{AppError, Backends, Engine, EngineError, EngineState, WorldRoot};

type Log = Rc<RefCell<Vec<String>>>;
type InitFn = Box<dyn FnOnce(&mut Scene) -> Result<(), AppError>>;

struct TestWorld {
    log: Log,
    on_init: Option<InitFn>,
}

impl TestWorld {
    fn new(log: &Log, on_init: impl FnOnce(&mut Scene) -> Result<(), AppError> + 'static) -> Self {
        Self {
            log: log.clone(),
            on_init: Some(Box::new(on_init)),
        }
    }
}

impl WorldRoot for TestWorld {
    fn init(&mut self, scene: &mut Scene) -> Result<(), AppError> {
        self.log.borrow_mut().push("world init".to_string());
        match self.on_init.take() {
            Some(on_init) => on_init(scene),
            None => Ok(()),
        }
    }

    fn start(&mut self, _scene: &mut Scene) {
        self.log.borrow_mut().push("world start".to_string());
    }

    fn update(&mut self, _scene: &mut Scene, _delta_time: f32) {
        self.log.borrow_mut().push("world update".to_string());
    }

    fn shutdown(&mut self, _scene: &mut Scene) {
        self.log.borrow_mut().push("world shutdown".to_string());
    }
}

/// Entity that logs its hooks and optionally acts on a given frame
struct Actor {
    tag: &'static str,
    log: Log,
    frame: u32,
    destroy_on: Option<u32>,
    quit_on: Option<u32>,
}

impl Actor {
    fn new(tag: &'static str, log: &Log) -> Self {
        Self {
            tag,
            log: log.clone(),
            frame: 0,
            destroy_on: None,
            quit_on: None,
        }
    }
}

impl Entity for Actor {
    fn update(&mut self, ctx: &mut EntityCtx<'_>, _delta_time: f32) {
        self.frame += 1;
        self.log.borrow_mut().push(format!("update {}", self.tag));
        if self.destroy_on == Some(self.frame) {
            ctx.destroy_self();
        }
        if self.quit_on == Some(self.frame) {
            ctx.scene.request_quit();
        }
    }

    fn on_destroyed(&mut self, _ctx: &mut EntityCtx<'_>) {
        self.log.borrow_mut().push(format!("destroyed {}", self.tag));
    }

    fn on_became_visible(&mut self, _ctx: &mut EntityCtx<'_>) {
        self.log.borrow_mut().push(format!("visible {}", self.tag));
    }

    fn on_became_hidden(&mut self, _ctx: &mut EntityCtx<'_>) {
        self.log.borrow_mut().push(format!("hidden {}", self.tag));
    }
}

struct Quad {
    tag: &'static str,
    log: Log,
    priority: i32,
}

impl Component for Quad {
    fn update(&mut self, _ctx: &mut EntityCtx<'_>, _delta_time: f32) {
        self.log.borrow_mut().push(format!("update {}", self.tag));
    }

    fn on_destroyed(&mut self, _ctx: &mut EntityCtx<'_>) {
        self.log.borrow_mut().push(format!("destroyed {}", self.tag));
    }

    fn as_render_surface(&mut self) -> Option<&mut dyn RenderSurface> {
        Some(self)
    }
}

impl RenderSurface for Quad {
    fn render_priority(&self) -> i32 {
        self.priority
    }

    fn draw(&mut self, transform: &Transform2D, canvas: &mut dyn Canvas) {
        canvas.submit(DrawCommand::Text {
            text: self.tag.to_string(),
            position: transform.position,
            color: Color::WHITE,
        });
    }
}

struct Steering {
    seen: Rc<RefCell<Vec<(InputEvent, bool)>>>,
}

impl Controllable for Steering {
    fn handle_event(&mut self, ctx: &mut EntityCtx<'_>, event: &InputEvent) {
        let held = ctx.scene.input().is_key_down(KeyCode::Up);
        self.seen.borrow_mut().push((event.clone(), held));
        if let Some(transform) = ctx.transform_mut() {
            transform.translate(Vec2::new(0.0, -1.0));
        }
    }
}

impl Component for Steering {
    fn as_controllable(&mut self) -> Option<&mut dyn Controllable> {
        Some(self)
    }
}

fn config() -> EngineConfig {
    EngineConfig::new().with_max_fps(1000)
}

fn headless(input: ScriptedInput) -> (Backends, PresentedFrames, Rc<Cell<u64>>) {
    let window = HeadlessWindow::create("test", 800, 600, WindowFlags::empty()).unwrap();
    let presented = window.presented();
    let physics = NullPhysics::new();
    let steps = physics.step_counter();
    let backends = Backends {
        graphics: Box::new(window),
        physics: Box::new(physics),
        input: Box::new(input),
    };
    (backends, presented, steps)
}

fn texts(frame: &[DrawCommand]) -> Vec<String> {
    frame
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| *e == entry).count()
}

#[test]
fn test_entity_updated_every_frame_until_quit() {
    let log: Log = Rc::default();
    let (backends, presented, steps) = headless(ScriptedInput::new().quit_after(4));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        scene.spawn(Actor::new("ship", &entity_log), Transform2D::at(50.0, 50.0));
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    let summary = engine.run().unwrap();

    assert_eq!(summary.frames, 4);
    assert!(summary.is_clean());
    assert_eq!(count(&log, "update ship"), 4);
    assert_eq!(count(&log, "destroyed ship"), 1);
    assert_eq!(presented.count(), 4);
    assert_eq!(steps.get(), 4);
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn test_lifecycle_call_order() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new().quit_after(1));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        scene.spawn(Actor::new("ship", &entity_log), Transform2D::at(50.0, 50.0));
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    engine.run().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "world init",
            "world start",
            "world update",
            "update ship",
            "destroyed ship",
            "world shutdown",
        ]
    );
}

#[test]
fn test_quit_on_first_poll_destroys_everything() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new().quit_after(1));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        for tag in ["a", "b", "c"] {
            let id = scene.spawn(Actor::new(tag, &entity_log), Transform2D::default());
            scene.attach(
                id,
                Quad {
                    tag,
                    log: entity_log.clone(),
                    priority: 0,
                },
            );
        }
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    let summary = engine.run().unwrap();

    assert_eq!(summary.frames, 1);
    assert_eq!(summary.live_objects, 0);
    assert_eq!(summary.live_components, 0);
    // Entity and its quad share a tag
    for tag in ["a", "b", "c"] {
        assert_eq!(count(&log, &format!("destroyed {tag}")), 2);
    }
    assert_eq!(log.borrow().last().map(String::as_str), Some("world shutdown"));
}

#[test]
fn test_surfaces_drawn_by_priority() {
    let log: Log = Rc::default();
    let (backends, presented, _) = headless(ScriptedInput::new().quit_after(3));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        let id = scene.spawn(Actor::new("ship", &entity_log), Transform2D::at(400.0, 300.0));
        for (tag, priority) in [("five", 5), ("one", 1), ("three", 3)] {
            scene.attach(
                id,
                Quad {
                    tag,
                    log: entity_log.clone(),
                    priority,
                },
            );
        }
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    engine.run().unwrap();

    for frame in 0..3 {
        assert_eq!(texts(&presented.frame(frame).unwrap()), vec!["one", "three", "five"]);
    }
    // One transition per surface, all on the first frame
    assert_eq!(count(&log, "visible ship"), 3);
    assert_eq!(count(&log, "hidden ship"), 0);
}

#[test]
fn test_entity_marked_in_update_drains_after_render() {
    let log: Log = Rc::default();
    let (backends, presented, _) = headless(ScriptedInput::new().quit_after(3));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        let mut doomed = Actor::new("doomed", &entity_log);
        doomed.destroy_on = Some(2);
        let id = scene.spawn(doomed, Transform2D::at(10.0, 10.0));
        scene.attach(
            id,
            Quad {
                tag: "doomed quad",
                log: entity_log.clone(),
                priority: 0,
            },
        );
        scene.spawn(Actor::new("survivor", &entity_log), Transform2D::default());
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();

    engine.start().unwrap();
    assert!(engine.run_frame().unwrap());
    assert!(engine.run_frame().unwrap());
    assert_eq!(engine.scene().entity_count(), 1);
    assert!(!engine.run_frame().unwrap());
    let summary = engine.shutdown().unwrap();

    assert!(summary.is_clean());
    assert_eq!(texts(&presented.frame(1).unwrap()), vec!["doomed quad"]);
    assert!(texts(&presented.frame(2).unwrap()).is_empty());
    assert_eq!(count(&log, "update doomed"), 2);
    assert_eq!(count(&log, "destroyed doomed"), 1);
    assert_eq!(count(&log, "destroyed doomed quad"), 1);

    let entries = log.borrow();
    let quad_at = entries.iter().position(|e| e == "destroyed doomed quad");
    let entity_at = entries.iter().position(|e| e == "destroyed doomed");
    assert!(quad_at < entity_at);
}

#[test]
fn test_input_updates_state_then_reaches_actors() {
    let log: Log = Rc::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let press = InputEvent::Key {
        key: KeyCode::Up,
        pressed: true,
    };
    let input = ScriptedInput::with_events([press.clone()]).quit_after(3);
    let (backends, _, _) = headless(input);

    let steering_seen = seen.clone();
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        let id = scene.spawn(Actor::new("ship", &entity_log), Transform2D::at(5.0, 5.0));
        scene.attach(id, Steering { seen: steering_seen });
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    engine.run().unwrap();

    // Quit is never forwarded; the empty second poll forwards nothing
    assert_eq!(*seen.borrow(), vec![(press, true)]);
}

#[test]
fn test_timers_advance_each_frame() {
    let log: Log = Rc::default();
    let fired = Rc::new(Cell::new(0u32));
    let (backends, _, _) = headless(ScriptedInput::new().quit_after(5));

    let counter = fired.clone();
    let world = TestWorld::new(&log, move |scene| {
        scene
            .timers_mut()
            .schedule_repeating(Duration::ZERO, move |_| counter.set(counter.get() + 1));
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    engine.run().unwrap();

    assert_eq!(fired.get(), 5);
}

#[test]
fn test_request_quit_stops_next_frame() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new());
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        let mut actor = Actor::new("ship", &entity_log);
        actor.quit_on = Some(3);
        scene.spawn(actor, Transform2D::default());
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    let summary = engine.run().unwrap();

    assert_eq!(summary.frames, 4);
    assert_eq!(count(&log, "update ship"), 4);
}

#[test]
fn test_double_initialize_rejected() {
    let log: Log = Rc::default();
    let (first, _, first_steps) = headless(ScriptedInput::new().quit_after(2));
    let (second, _, second_steps) = headless(ScriptedInput::new());

    let mut engine = Engine::new(config()).unwrap();
    engine
        .initialize(first, Box::new(TestWorld::new(&log, |_| Ok(()))))
        .unwrap();
    let err = engine
        .initialize(second, Box::new(TestWorld::new(&log, |_| Ok(()))))
        .unwrap_err();
    assert!(matches!(err, EngineError::AlreadyInitialized));
    assert_eq!(engine.state(), EngineState::Initialized);

    engine.run().unwrap();
    assert_eq!(first_steps.get(), 2);
    assert_eq!(second_steps.get(), 0);
    assert_eq!(Rc::strong_count(&second_steps), 1);
}

#[test]
fn test_world_init_failure_aborts_start() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new());
    let world = TestWorld::new(&log, |_| Err(AppError::Config("missing sprite".to_string())));

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();

    let err = engine.run().unwrap_err();
    assert!(matches!(err, EngineError::World(AppError::Config(_))));
    assert_eq!(engine.state(), EngineState::Initialized);
    assert_eq!(engine.frame_count(), 0);
}

#[test]
fn test_frame_before_start_is_rejected() {
    let mut engine = Engine::new(config()).unwrap();
    assert!(matches!(
        engine.run_frame(),
        Err(EngineError::InvalidState {
            expected: EngineState::Running,
            actual: EngineState::Uninitialized,
        })
    ));
    assert!(engine.shutdown().is_err());
}

#[test]
fn test_invalid_config_rejected() {
    let result = Engine::new(EngineConfig::new().with_max_fps(0));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[test]
fn test_frames_are_paced() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new().quit_after(5));
    let world = TestWorld::new(&log, |_| Ok(()));

    let mut engine = Engine::new(EngineConfig::new().with_max_fps(100)).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();

    let started = Instant::now();
    engine.run().unwrap();

    assert!(started.elapsed() >= Duration::from_millis(45));
    assert!(engine.delta_time() >= Duration::from_millis(9));
}

/// Leaves debris behind when destroyed
struct Rock {
    log: Log,
}

impl Entity for Rock {
    fn on_destroyed(&mut self, ctx: &mut EntityCtx<'_>) {
        self.log.borrow_mut().push("destroyed rock".to_string());
        let debris = Actor::new("debris", &self.log);
        ctx.scene.spawn(debris, ctx.transform());
    }
}

#[test]
fn test_shutdown_destroys_entities_spawned_during_teardown() {
    let log: Log = Rc::default();
    let (backends, _, _) = headless(ScriptedInput::new().quit_after(1));
    let entity_log = log.clone();
    let world = TestWorld::new(&log, move |scene| {
        scene.spawn(Rock { log: entity_log }, Transform2D::at(20.0, 20.0));
        Ok(())
    });

    let mut engine = Engine::new(config()).unwrap();
    engine.initialize(backends, Box::new(world)).unwrap();
    let summary = engine.run().unwrap();

    assert_eq!(summary.frames, 1);
    assert!(summary.is_clean());
    assert_eq!(engine.scene().entity_count(), 0);
    assert_eq!(count(&log, "destroyed rock"), 1);
    assert_eq!(count(&log, "destroyed debris"), 1);
}
