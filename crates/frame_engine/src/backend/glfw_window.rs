//! Desktop window using GLFW
//!
//! [`GlfwWindow::create`] returns the graphics half and the input half as two
//! backends. The graphics half owns the window and pumps the OS event queue
//! when it presents; the input half owns the event receiver and hands events
//! to the engine one at a time.
//!
//! No rasterizer is bundled: `present` only swaps buffers, so the window
//! shows a blank surface. The draw commands of each presented frame are
//! kept and exposed through [`GlfwWindow::last_frame`] for an external
//! renderer to consume.

use std::collections::VecDeque;

use glfw::Context;

use super::{check_size, GraphicsBackend, WindowError, WindowFlags, WindowResult};
use crate::input::{InputBackend, InputEvent, KeyCode, MouseButton};
use crate::render::{Canvas, CommandList, DrawCommand};

/// Graphics half of a GLFW window
pub struct GlfwWindow {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    frame: CommandList,
    last_frame: Vec<DrawCommand>,
}

/// Input half of a GLFW window
pub struct GlfwInput {
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    pending: VecDeque<InputEvent>,
}

impl GlfwWindow {
    /// Open a window and split it into graphics and input backends
    pub fn create(
        title: &str,
        width: u32,
        height: u32,
        flags: WindowFlags,
    ) -> WindowResult<(Self, GlfwInput)> {
        check_size(width, height)?;

        let mut glfw = glfw::init(glfw::fail_on_errors)
            .map_err(|e| WindowError::InitializationFailed(format!("{e:?}")))?;

        glfw.window_hint(glfw::WindowHint::Resizable(flags.contains(WindowFlags::RESIZABLE)));
        glfw.window_hint(glfw::WindowHint::Visible(!flags.contains(WindowFlags::HIDDEN)));

        let created = if flags.contains(WindowFlags::FULLSCREEN) {
            glfw.with_primary_monitor(|glfw, monitor| {
                let mode = monitor.map_or(glfw::WindowMode::Windowed, |m| glfw::WindowMode::FullScreen(m));
                glfw.create_window(width, height, title, mode)
            })
        } else {
            glfw.create_window(width, height, title, glfw::WindowMode::Windowed)
        };
        let (mut window, events) =
            created.ok_or_else(|| WindowError::CreationFailed(title.to_string()))?;

        window.make_current();
        window.set_all_polling(true);
        let interval = if flags.contains(WindowFlags::VSYNC) {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        };
        glfw.set_swap_interval(interval);

        log::info!("Opened GLFW window '{title}' ({width}x{height})");

        Ok((
            Self {
                glfw,
                window,
                frame: CommandList::new(),
                last_frame: Vec::new(),
            },
            GlfwInput {
                events,
                pending: VecDeque::new(),
            },
        ))
    }

    /// Commands of the last presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }
}

impl GraphicsBackend for GlfwWindow {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn present(&mut self) {
        self.last_frame = self.frame.take();
        log::trace!("Presenting {} draw commands", self.last_frame.len());
        self.window.swap_buffers();
        self.glfw.poll_events();
    }

    #[allow(clippy::cast_sign_loss)]
    fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_framebuffer_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.frame
    }
}

impl InputBackend for GlfwInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        for (_, event) in glfw::flush_messages(&self.events) {
            if let Some(event) = translate_event(event) {
                self.pending.push_back(event);
            }
        }
        self.pending.pop_front()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn translate_event(event: glfw::WindowEvent) -> Option<InputEvent> {
    match event {
        glfw::WindowEvent::Close => Some(InputEvent::Quit),
        glfw::WindowEvent::Key(key, _, action, _) => {
            let pressed = match action {
                glfw::Action::Press => true,
                glfw::Action::Release => false,
                glfw::Action::Repeat => return None,
            };
            Some(InputEvent::Key {
                key: translate_key(key),
                pressed,
            })
        }
        glfw::WindowEvent::MouseButton(button, action, _) => {
            let button = match button {
                glfw::MouseButton::Button1 => MouseButton::Left,
                glfw::MouseButton::Button2 => MouseButton::Right,
                glfw::MouseButton::Button3 => MouseButton::Middle,
                _ => return None,
            };
            Some(InputEvent::MouseButton {
                button,
                pressed: action != glfw::Action::Release,
            })
        }
        glfw::WindowEvent::CursorPos(x, y) => Some(InputEvent::MouseMoved {
            x: x as f32,
            y: y as f32,
        }),
        glfw::WindowEvent::FramebufferSize(width, height) => Some(InputEvent::Resized {
            width: width.max(0) as u32,
            height: height.max(0) as u32,
        }),
        _ => None,
    }
}

fn translate_key(key: glfw::Key) -> KeyCode {
    use glfw::Key;

    match key {
        Key::A => KeyCode::A,
        Key::B => KeyCode::B,
        Key::C => KeyCode::C,
        Key::D => KeyCode::D,
        Key::E => KeyCode::E,
        Key::F => KeyCode::F,
        Key::G => KeyCode::G,
        Key::H => KeyCode::H,
        Key::I => KeyCode::I,
        Key::J => KeyCode::J,
        Key::K => KeyCode::K,
        Key::L => KeyCode::L,
        Key::M => KeyCode::M,
        Key::N => KeyCode::N,
        Key::O => KeyCode::O,
        Key::P => KeyCode::P,
        Key::Q => KeyCode::Q,
        Key::R => KeyCode::R,
        Key::S => KeyCode::S,
        Key::T => KeyCode::T,
        Key::U => KeyCode::U,
        Key::V => KeyCode::V,
        Key::W => KeyCode::W,
        Key::X => KeyCode::X,
        Key::Y => KeyCode::Y,
        Key::Z => KeyCode::Z,
        Key::Space => KeyCode::Space,
        Key::Enter => KeyCode::Enter,
        Key::Escape => KeyCode::Escape,
        Key::Up => KeyCode::Up,
        Key::Down => KeyCode::Down,
        Key::Left => KeyCode::Left,
        Key::Right => KeyCode::Right,
        _ => KeyCode::Unknown,
    }
}
