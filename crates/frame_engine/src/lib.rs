//! # Frame Engine
//!
//! A single-threaded real-time game loop for 2D scenes of composable
//! entities.
//!
//! ## Features
//!
//! - **Frame pacing**: a capped frame rate with real elapsed time per frame
//! - **Entities and components**: generational arenas, deferred destruction
//! - **Render ordering**: surfaces drawn by ascending priority
//! - **Visibility hooks**: enter/exit callbacks against a padded viewport
//! - **Pluggable backends**: headless for tests, GLFW for a desktop window
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frame_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl WorldRoot for MyGame {
//!     fn init(&mut self, scene: &mut Scene) -> Result<(), AppError> {
//!         // Spawn your entities
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, scene: &mut Scene, delta_time: f32) {
//!         // Update game logic
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let window = HeadlessWindow::create("game", 800, 600, config.window.flags())?;
//!     let backends = Backends {
//!         graphics: Box::new(window),
//!         physics: Box::new(NullPhysics::new()),
//!         input: Box::new(ScriptedInput::new().quit_after(60)),
//!     };
//!
//!     let mut engine = Engine::new(config)?;
//!     engine.initialize(backends, Box::new(MyGame))?;
//!     engine.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

// Core engine modules
pub mod config;
pub mod core;

pub mod backend;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod timers;

mod application;
mod engine;

#[cfg(test)]
mod engine_tests;

pub use application::{AppError, WorldRoot};
pub use engine::{Backends, Engine, EngineError, EngineState, RunSummary};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        backend::{
            headless::{HeadlessWindow, ScriptedInput},
            GraphicsBackend, WindowFlags,
        },
        core::{Config, EngineConfig, WindowConfig},
        ecs::{Component, ComponentId, Entity, EntityCtx, EntityId, Scene},
        foundation::{
            math::{Transform2D, Vec2},
            time::FrameClock,
        },
        input::{Controllable, InputBackend, InputEvent, KeyCode, MouseButton},
        physics::{NullPhysics, PhysicsBackend},
        render::{Canvas, Color, DrawCommand, RenderSurface},
        timers::TimerHandle,
        AppError, Backends, Engine, EngineError, EngineState, RunSummary, WorldRoot,
    };

    #[cfg(feature = "glfw-backend")]
    pub use crate::backend::glfw_window::{GlfwInput, GlfwWindow};
}
