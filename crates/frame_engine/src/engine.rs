//! Core engine implementation
//!
//! [`Engine`] owns the backends, the world root and the [`Scene`], and
//! drives them through a fixed per-frame order:
//!
//! 1. pace the frame
//! 2. poll one input event; quit starts shutdown, anything else updates the
//!    input state and goes to every actor
//! 3. step physics
//! 4. fire due timers, update the world root, then every entity followed by
//!    its components
//! 5. render surfaces in priority order
//! 6. drain entities marked for destruction
//!
//! A quit seen in step 2 still lets the rest of that frame run.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::application::{AppError, WorldRoot};
use crate::backend::{GraphicsBackend, WindowError};
use crate::config::ConfigError;
use crate::core::EngineConfig;
use crate::ecs::Scene;
use crate::foundation::time::FrameClock;
use crate::input::InputBackend;
use crate::physics::{PhysicsBackend, PhysicsError};
use crate::render;

/// Mark-and-drain rounds attempted at shutdown before giving up
const MAX_TEARDOWN_PASSES: usize = 16;

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed, no backends yet
    Uninitialized,
    /// Backends and world root installed
    Initialized,
    /// Inside the frame loop
    Running,
    /// Quit received; the current frame finishes, then teardown runs
    ShuttingDown,
    /// Teardown complete
    Terminated,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::ShuttingDown => "shutting down",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// External collaborators handed to [`Engine::initialize`]
pub struct Backends {
    /// Window and renderer
    pub graphics: Box<dyn GraphicsBackend>,
    /// Physics world
    pub physics: Box<dyn PhysicsBackend>,
    /// Raw event pump
    pub input: Box<dyn InputBackend>,
}

/// Counts reported when the engine terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames executed
    pub frames: u64,
    /// Entities still counted alive after the final drain
    pub live_objects: usize,
    /// Components still counted alive after the final drain
    pub live_components: usize,
}

impl RunSummary {
    /// Whether teardown released everything
    pub fn is_clean(&self) -> bool {
        self.live_objects == 0 && self.live_components == 0
    }
}

/// Main engine struct
///
/// The engine coordinates all subsystems and manages the main loop.
pub struct Engine {
    config: EngineConfig,
    state: EngineState,
    clock: FrameClock,
    scene: Scene,
    backends: Option<Backends>,
    world: Option<Box<dyn WorldRoot>>,
    frames: u64,
}

impl Engine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Creating engine ({} fps cap)", config.max_fps);

        let clock = FrameClock::new(config.max_fps).with_max_frame_time(config.max_frame_duration());
        Ok(Self {
            config,
            state: EngineState::Uninitialized,
            clock,
            scene: Scene::new(),
            backends: None,
            world: None,
            frames: 0,
        })
    }

    /// Install the backends and the world root
    ///
    /// Runs the physics backend's `init`. A second call is rejected with
    /// [`EngineError::AlreadyInitialized`] and its arguments are dropped.
    pub fn initialize(&mut self, mut backends: Backends, world: Box<dyn WorldRoot>) -> Result<(), EngineError> {
        if self.state != EngineState::Uninitialized {
            log::warn!("Engine already initialized; dropping duplicate backends");
            return Err(EngineError::AlreadyInitialized);
        }

        backends.physics.init()?;
        self.scene.set_viewport(backends.graphics.size());
        self.backends = Some(backends);
        self.world = Some(world);
        self.state = EngineState::Initialized;
        log::info!("Engine initialized");
        Ok(())
    }

    /// Run the world root's `init` and `start` and enter the running state
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.expect_state(EngineState::Initialized)?;
        let world = self.world.as_mut().ok_or(EngineError::InvalidState {
            expected: EngineState::Initialized,
            actual: self.state,
        })?;

        world.init(&mut self.scene)?;
        world.start(&mut self.scene);

        self.clock.reset();
        self.state = EngineState::Running;
        log::info!("Starting main loop...");
        Ok(())
    }

    /// Execute one frame
    ///
    /// Returns `false` once a quit has been seen; the frame that saw it is
    /// still completed.
    pub fn run_frame(&mut self) -> Result<bool, EngineError> {
        self.expect_state(EngineState::Running)?;
        let (Some(backends), Some(world)) = (self.backends.as_mut(), self.world.as_mut()) else {
            return Err(EngineError::InvalidState {
                expected: EngineState::Running,
                actual: self.state,
            });
        };

        let delta_secs = self.clock.tick();
        let delta = self.clock.delta();

        let quit_requested = self.scene.take_quit_request();
        match backends.input.poll_event() {
            Some(event) if event.is_quit() => {
                log::info!("Quit received");
                self.state = EngineState::ShuttingDown;
            }
            Some(event) => {
                if quit_requested {
                    self.state = EngineState::ShuttingDown;
                }
                self.scene.dispatch_input(&event);
            }
            None if quit_requested => self.state = EngineState::ShuttingDown,
            None => {}
        }

        backends.physics.step_frame();

        self.scene.set_viewport(backends.graphics.size());
        self.scene.advance_timers(delta);
        world.update(&mut self.scene, delta_secs);
        self.scene.update_entities(delta_secs);

        render::render_frame(&mut self.scene, backends.graphics.as_mut(), self.config.visibility_leeway);

        self.scene.drain_pending();
        self.frames += 1;

        if self.frames % 600 == 0 {
            log::debug!(
                "Frame {}: {:.1} fps, {} entities",
                self.frames,
                self.clock.average_fps(),
                self.scene.entity_count()
            );
        }

        Ok(self.state == EngineState::Running)
    }

    /// Tear the scene down and stop
    ///
    /// Marks every live entity and drains, repeating while destruction hooks
    /// keep spawning, then reports the live counts before and after. Returns
    /// the counts left over, which should be zero.
    pub fn shutdown(&mut self) -> Result<RunSummary, EngineError> {
        match self.state {
            EngineState::Running | EngineState::ShuttingDown => {}
            actual => {
                return Err(EngineError::InvalidState {
                    expected: EngineState::ShuttingDown,
                    actual,
                })
            }
        }
        self.state = EngineState::ShuttingDown;
        log::info!("Shutting down after {} frames", self.frames);

        self.scene.instance_counter().report("Before teardown");
        self.scene.destroy_all(MAX_TEARDOWN_PASSES);

        let counter = *self.scene.instance_counter();
        counter.report("After teardown");
        if !counter.is_clear() {
            log::warn!(
                "Leaked {} objects and {} components",
                counter.live_objects(),
                counter.live_components()
            );
        }

        if let Some(world) = self.world.as_mut() {
            world.shutdown(&mut self.scene);
        }
        self.state = EngineState::Terminated;

        Ok(RunSummary {
            frames: self.frames,
            live_objects: counter.live_objects(),
            live_components: counter.live_components(),
        })
    }

    /// Start, loop until quit, then shut down
    pub fn run(&mut self) -> Result<RunSummary, EngineError> {
        self.start()?;
        while self.run_frame()? {}
        self.shutdown()
    }

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Frames executed so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Elapsed time of the last frame
    pub fn delta_time(&self) -> Duration {
        self.clock.delta()
    }

    /// The scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene, e.g. to seed it before `start`
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn expect_state(&self, expected: EngineState) -> Result<(), EngineError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidState {
                expected,
                actual: self.state,
            })
        }
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// `initialize` called twice
    #[error("Engine is already initialized")]
    AlreadyInitialized,

    /// Operation not allowed in the current state
    #[error("Engine is {actual}, expected {expected}")]
    InvalidState {
        /// State the operation requires
        expected: EngineState,
        /// State the engine was in
        actual: EngineState,
    },

    /// Window or graphics backend error
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Physics backend error
    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// World root error
    #[error("Application error: {0}")]
    World(#[from] AppError),
}
