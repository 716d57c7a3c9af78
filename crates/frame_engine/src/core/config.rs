//! # Engine Configuration
//!
//! Startup settings for the game loop: window title and size, frame-rate
//! cap, visibility margin and logging. Everything here is read once when the
//! engine is constructed.
//!
//! ```toml
//! max_fps = 60
//! visibility_leeway = 20.0
//! log_level = "info"
//!
//! [window]
//! title = "My Game"
//! width = 800
//! height = 600
//! resizable = true
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::WindowFlags;
use crate::config::{Config, ConfigError};

/// # Window Configuration
///
/// Parameters handed to the graphics backend when the drawable surface is
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Whether the window can be resized
    pub resizable: bool,
    /// Whether to start in fullscreen
    pub fullscreen: bool,
    /// Whether presentation waits for vertical sync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Default::default()
        }
    }

    /// Backend creation flags derived from the boolean options
    pub fn flags(&self) -> WindowFlags {
        let mut flags = WindowFlags::empty();
        flags.set(WindowFlags::RESIZABLE, self.resizable);
        flags.set(WindowFlags::FULLSCREEN, self.fullscreen);
        flags.set(WindowFlags::VSYNC, self.vsync);
        flags
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Frame Engine Application".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            fullscreen: false,
            vsync: false,
        }
    }
}

/// # Engine Configuration
///
/// Core loop behavior shared by every subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Upper bound on frames per second; the loop sleeps to honour it
    pub max_fps: u32,
    /// Margin in pixels added around the viewport for visibility tests
    pub visibility_leeway: f32,
    /// Optional clamp on a single frame's elapsed time, in seconds
    pub max_frame_time: Option<f32>,
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            window: WindowConfig::default(),
            max_fps: 60,
            visibility_leeway: 20.0,
            max_frame_time: None,
            log_level: "info".to_string(),
        }
    }

    /// Set window settings
    #[must_use]
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Set the frame-rate cap
    #[must_use]
    pub fn with_max_fps(mut self, max_fps: u32) -> Self {
        self.max_fps = max_fps;
        self
    }

    /// Set the visibility margin
    #[must_use]
    pub fn with_visibility_leeway(mut self, leeway: f32) -> Self {
        self.visibility_leeway = leeway;
        self
    }

    /// Clamp a single frame's elapsed time
    #[must_use]
    pub fn with_max_frame_time(mut self, seconds: Option<f32>) -> Self {
        self.max_frame_time = seconds;
        self
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Elapsed-time clamp as a `Duration`
    ///
    /// `None` when unset or not representable; [`EngineConfig::validate`]
    /// rejects the latter.
    pub fn max_frame_duration(&self) -> Option<Duration> {
        self.max_frame_time
            .and_then(|seconds| Duration::try_from_secs_f32(seconds).ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fps == 0 {
            return Err(ConfigError::Invalid("max_fps must be at least 1".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if !self.visibility_leeway.is_finite() || self.visibility_leeway < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "visibility_leeway must be a non-negative number, got {}",
                self.visibility_leeway
            )));
        }
        if let Some(max) = self.max_frame_time {
            if !max.is_finite() || max <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "max_frame_time must be positive, got {max}"
                )));
            }
            if Duration::try_from_secs_f32(max).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "max_frame_time is out of range, got {max}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
