//! World root trait and application-level errors

use thiserror::Error;

use crate::ecs::Scene;

/// Top-level game object driven by the engine
///
/// Implement this trait to create your game. The world root is updated
/// before every entity each frame and is the natural place for spawning and
/// global game state.
pub trait WorldRoot {
    /// Build the initial scene
    ///
    /// Called once when the engine starts. An error aborts startup.
    fn init(&mut self, scene: &mut Scene) -> Result<(), AppError>;

    /// Called once after `init`, right before the first frame
    fn start(&mut self, scene: &mut Scene) {
        let _ = scene;
    }

    /// Called every frame before any entity updates
    ///
    /// # Arguments
    /// * `scene` - The scene, for spawning, marking or querying
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, scene: &mut Scene, delta_time: f32);

    /// Called once after every entity has been destroyed
    fn shutdown(&mut self, scene: &mut Scene) {
        let _ = scene;
    }
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
