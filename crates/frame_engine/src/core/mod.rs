//! # Core Engine Module
//!
//! Shared configuration types used by the engine loop and its backends.

pub mod config;

pub use config::{EngineConfig, WindowConfig};
pub use crate::config::{Config, ConfigError};
