//! # Backend Module
//!
//! Concrete window, graphics and input backends. The engine only sees the
//! [`GraphicsBackend`] and [`InputBackend`](crate::input::InputBackend)
//! traits, so the loop runs identically against a real window or the
//! headless recorder used by tests.
//!
//! - [`headless`]: in-memory window and scripted input, always available
//! - `glfw_window`: desktop window, behind the `glfw-backend` feature

pub mod headless;

#[cfg(feature = "glfw-backend")]
pub mod glfw_window;

use bitflags::bitflags;
use thiserror::Error;

use crate::render::Canvas;

bitflags! {
    /// Window creation options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// User may resize the window
        const RESIZABLE = 1 << 0;
        /// Cover the primary monitor
        const FULLSCREEN = 1 << 1;
        /// Present on vertical blank
        const VSYNC = 1 << 2;
        /// Create the window without showing it
        const HIDDEN = 1 << 3;
    }
}

/// Window and graphics context errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// Windowing library failed to start
    #[error("Window system initialization failed: {0}")]
    InitializationFailed(String),

    /// The window itself could not be created
    #[error("Window creation failed: {0}")]
    CreationFailed(String),

    /// Zero-sized windows are rejected
    #[error("Invalid window size {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result alias for backend construction
pub type WindowResult<T> = Result<T, WindowError>;

/// Window plus renderer handle
///
/// Each frame the engine calls [`clear`](GraphicsBackend::clear), lets every
/// visible surface draw into [`canvas`](GraphicsBackend::canvas), then calls
/// [`present`](GraphicsBackend::present).
pub trait GraphicsBackend {
    /// Start a new frame
    fn clear(&mut self);

    /// Show the frame built since the last `clear`
    fn present(&mut self);

    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Renderer handle surfaces draw into
    fn canvas(&mut self) -> &mut dyn Canvas;
}

pub(crate) fn check_size(width: u32, height: u32) -> WindowResult<()> {
    if width == 0 || height == 0 {
        return Err(WindowError::InvalidSize { width, height });
    }
    Ok(())
}
