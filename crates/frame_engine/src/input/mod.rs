//! Input management system
//!
//! The engine pulls at most one raw event per frame from an [`InputBackend`].
//! [`InputEvent::Quit`] ends the loop; every other event first updates the
//! shared [`InputState`] and is then forwarded verbatim to each registered
//! [`Controllable`].

use std::collections::HashSet;

use crate::ecs::EntityCtx;
use crate::foundation::math::Vec2;

/// Source of raw input events
pub trait InputBackend {
    /// Pop the next pending event, if any
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// Receiver of routed input events
pub trait Controllable {
    /// Handle one raw event
    fn handle_event(&mut self, ctx: &mut EntityCtx<'_>, event: &InputEvent);
}

/// Raw input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Window close requested; stops the loop
    Quit,

    /// Key input event
    Key {
        /// The key that was pressed/released
        key: KeyCode,
        /// Whether the key was pressed (true) or released (false)
        pressed: bool,
    },

    /// Mouse button event
    MouseButton {
        /// The mouse button that was pressed/released
        button: MouseButton,
        /// Whether the button was pressed (true) or released (false)
        pressed: bool,
    },

    /// Mouse movement
    MouseMoved {
        /// New X coordinate
        x: f32,
        /// New Y coordinate
        y: f32,
    },

    /// Window was resized
    Resized {
        /// New window width
        width: u32,
        /// New window height
        height: u32,
    },
}

impl InputEvent {
    /// Whether this event asks the loop to stop
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space bar
    Space,
    /// Enter/Return key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Anything the backend could not map
    Unknown,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Snapshot of held keys, held buttons and cursor position
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    cursor: Vec2,
}

impl InputState {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the snapshot
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { key, pressed } => {
                if pressed {
                    self.keys.insert(key);
                } else {
                    self.keys.remove(&key);
                }
            }
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.buttons.insert(button);
                } else {
                    self.buttons.remove(&button);
                }
            }
            InputEvent::MouseMoved { x, y } => {
                self.cursor = Vec2::new(x, y);
            }
            InputEvent::Quit | InputEvent::Resized { .. } => {}
        }
    }

    /// Whether `key` is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether `button` is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last reported cursor position
    pub fn cursor_position(&self) -> Vec2 {
        self.cursor
    }
}
