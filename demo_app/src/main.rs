//! Drifting rocks demo
//!
//! Runs a small scene through the engine loop. By default the run is
//! headless: a scripted input stream steers the ship, fires a few shots and
//! quits after a configured number of frames. Build with the `windowed`
//! feature to play it in a GLFW window instead.
//!
//! Usage: `drifting_rocks [config.toml|config.ron]`

mod config;
mod game;

use frame_engine::backend::WindowError;
use frame_engine::foundation::logging;
use frame_engine::prelude::*;
use thiserror::Error;

use crate::config::DemoConfig;
use crate::game::Game;

const DEFAULT_CONFIG_PATH: &str = "demo_app/config.toml";

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] frame_engine::core::ConfigError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

fn main() {
    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = DemoConfig::load_or_default(&path)?;
    logging::init_logging(&config.engine.log_level);

    log::info!("Starting drifting rocks ({path})");

    let backends = create_backends(&config)?;
    let game = Game::new(&config);
    let stats = game.stats();

    let mut engine = Engine::new(config.engine.clone())?;
    engine.initialize(backends, Box::new(game))?;
    let summary = engine.run()?;

    log::info!(
        "Ran {} frames; {} rocks spawned, {} shots fired",
        summary.frames,
        stats.rocks_spawned.get(),
        stats.shots_fired.get()
    );
    if !summary.is_clean() {
        log::warn!(
            "Teardown left {} objects and {} components alive",
            summary.live_objects,
            summary.live_components
        );
    }
    Ok(())
}

#[cfg(not(feature = "windowed"))]
fn create_backends(config: &DemoConfig) -> Result<Backends, DemoError> {
    let window = &config.engine.window;
    let graphics = HeadlessWindow::create(&window.title, window.width, window.height, window.flags())?;
    let input = ScriptedInput::with_events(script()).quit_after(config.headless_frames.max(1));

    Ok(Backends {
        graphics: Box::new(graphics),
        physics: Box::new(NullPhysics::new()),
        input: Box::new(input),
    })
}

#[cfg(feature = "windowed")]
fn create_backends(config: &DemoConfig) -> Result<Backends, DemoError> {
    let window = &config.engine.window;
    let (graphics, input) = GlfwWindow::create(&window.title, window.width, window.height, window.flags())?;

    Ok(Backends {
        graphics: Box::new(graphics),
        physics: Box::new(NullPhysics::new()),
        input: Box::new(input),
    })
}

/// Scripted session: nudge left, fire twice, drift right
#[cfg(not(feature = "windowed"))]
fn script() -> Vec<InputEvent> {
    let key = |key, pressed| InputEvent::Key { key, pressed };
    vec![
        key(KeyCode::Left, true),
        key(KeyCode::Space, true),
        key(KeyCode::Space, false),
        key(KeyCode::Left, false),
        key(KeyCode::Space, true),
        key(KeyCode::Space, false),
        key(KeyCode::Right, true),
    ]
}
