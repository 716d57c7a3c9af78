//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// `RUST_LOG` wins when set; otherwise `default_level` (an `env_logger`
/// filter string such as `"info"` or `"frame_engine=debug"`) is used.
/// Only the first call has any effect.
pub fn init_logging(default_level: &str) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.parse_filters(default_level);
        }

        // Several test binaries may race to install a logger.
        if builder.try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}
