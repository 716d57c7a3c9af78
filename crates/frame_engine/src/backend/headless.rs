//! Headless backends
//!
//! [`HeadlessWindow`] records the draw commands of every presented frame
//! instead of rasterizing them, and [`ScriptedInput`] replays a fixed list
//! of events. Both hand out cheap shared handles so a test can inspect what
//! happened after the backends have been moved into the engine.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{check_size, GraphicsBackend, WindowFlags, WindowResult};
use crate::input::{InputBackend, InputEvent};
use crate::render::{Canvas, CommandList, DrawCommand};

/// Shared view of the frames a [`HeadlessWindow`] has presented
#[derive(Debug, Clone, Default)]
pub struct PresentedFrames {
    frames: Rc<RefCell<Vec<Vec<DrawCommand>>>>,
}

impl PresentedFrames {
    /// Number of frames presented
    pub fn count(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Commands of frame `index`
    pub fn frame(&self, index: usize) -> Option<Vec<DrawCommand>> {
        self.frames.borrow().get(index).cloned()
    }

    /// Commands of the most recent frame
    pub fn last(&self) -> Option<Vec<DrawCommand>> {
        self.frames.borrow().last().cloned()
    }

    fn push(&self, commands: Vec<DrawCommand>) {
        self.frames.borrow_mut().push(commands);
    }
}

/// Window that never touches the display
pub struct HeadlessWindow {
    title: String,
    size: (u32, u32),
    flags: WindowFlags,
    current: CommandList,
    presented: PresentedFrames,
}

impl HeadlessWindow {
    /// Create a headless window of the given size
    pub fn create(title: &str, width: u32, height: u32, flags: WindowFlags) -> WindowResult<Self> {
        check_size(width, height)?;
        log::debug!("Created headless window '{title}' ({width}x{height}, {flags:?})");
        Ok(Self {
            title: title.to_string(),
            size: (width, height),
            flags,
            current: CommandList::new(),
            presented: PresentedFrames::default(),
        })
    }

    /// Window title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Creation flags
    pub fn flags(&self) -> WindowFlags {
        self.flags
    }

    /// Resize the drawable area
    pub fn set_size(&mut self, width: u32, height: u32) -> WindowResult<()> {
        check_size(width, height)?;
        self.size = (width, height);
        Ok(())
    }

    /// Handle to the presented frames
    pub fn presented(&self) -> PresentedFrames {
        self.presented.clone()
    }
}

impl GraphicsBackend for HeadlessWindow {
    fn clear(&mut self) {
        self.current.clear();
    }

    fn present(&mut self) {
        self.presented.push(self.current.take());
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.current
    }
}

/// Shared count of polls made against a [`ScriptedInput`]
#[derive(Debug, Clone, Default)]
pub struct PollCounter(Rc<RefCell<u64>>);

impl PollCounter {
    /// Polls so far
    pub fn get(&self) -> u64 {
        *self.0.borrow()
    }

    fn bump(&self) -> u64 {
        let mut polls = self.0.borrow_mut();
        *polls += 1;
        *polls
    }
}

/// Input backend replaying queued events, one per poll
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
    quit_after: Option<u64>,
    polls: PollCounter,
}

impl ScriptedInput {
    /// Backend with no events
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend replaying `events` in order
    pub fn with_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Report [`InputEvent::Quit`] on poll number `polls` (1-based) and on
    /// every poll after it
    pub fn quit_after(mut self, polls: u64) -> Self {
        self.quit_after = Some(polls);
        self
    }

    /// Append an event
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Handle to the poll count
    pub fn polls(&self) -> PollCounter {
        self.polls.clone()
    }
}

impl InputBackend for ScriptedInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        let poll = self.polls.bump();
        if self.quit_after.is_some_and(|limit| poll >= limit) {
            return Some(InputEvent::Quit);
        }
        self.events.pop_front()
    }
}
