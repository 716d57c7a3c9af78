//! Physics stepping
//!
//! The loop treats physics as an opaque stage: it is initialized once with
//! the engine and stepped once per frame, before timers and updates.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;

/// Physics backend errors
#[derive(Error, Debug)]
pub enum PhysicsError {
    /// Backend could not set up its world
    #[error("Physics initialization failed: {0}")]
    InitializationFailed(String),
}

/// Simulation advanced once per frame
pub trait PhysicsBackend {
    /// Prepare the simulation; called once from `Engine::initialize`
    fn init(&mut self) -> Result<(), PhysicsError> {
        Ok(())
    }

    /// Advance the simulation by one frame
    fn step_frame(&mut self);
}

/// Backend that only counts its steps
#[derive(Debug, Default)]
pub struct NullPhysics {
    initialized: bool,
    steps: Rc<Cell<u64>>,
}

impl NullPhysics {
    /// Create a counter-only backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared step count, readable after the backend moves into the engine
    pub fn step_counter(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.steps)
    }

    /// Whether `init` ran
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl PhysicsBackend for NullPhysics {
    fn init(&mut self) -> Result<(), PhysicsError> {
        self.initialized = true;
        Ok(())
    }

    fn step_frame(&mut self) {
        self.steps.set(self.steps.get() + 1);
    }
}
