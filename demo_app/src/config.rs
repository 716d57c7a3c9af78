//! Demo settings, loaded from TOML or RON

use frame_engine::core::{Config, EngineConfig, WindowConfig};
use serde::{Deserialize, Serialize};

/// Settings for the drifting-rocks demo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Engine settings
    pub engine: EngineConfig,
    /// Frames to run when headless
    pub headless_frames: u64,
    /// Delay between rock spawns
    pub rock_interval_ms: u64,
    /// Rocks present on the first frame
    pub initial_rocks: u32,
    /// Seed for rock placement
    pub seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new().with_window(WindowConfig::new("Drifting Rocks", 800, 600)),
            headless_frames: 300,
            rock_interval_ms: 750,
            initial_rocks: 4,
            seed: 7,
        }
    }
}

impl Config for DemoConfig {}
