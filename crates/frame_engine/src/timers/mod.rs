//! Scheduled callbacks
//!
//! Timers count down in frame time. The engine advances them once per frame
//! after physics and before the world root updates; a due callback runs with
//! full access to the [`Scene`].

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::ecs::Scene;

new_key_type! {
    /// Handle returned when scheduling a timer
    pub struct TimerHandle;
}

type TimerCallback = Box<dyn FnMut(&mut Scene)>;

struct TimerEntry {
    remaining: Duration,
    interval: Option<Duration>,
    /// Taken out while the callback runs
    callback: Option<TimerCallback>,
    cancelled: bool,
}

/// Owner of all pending timers
#[derive(Default)]
pub struct TimerManager {
    timers: SlotMap<TimerHandle, TimerEntry>,
}

impl TimerManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once after `delay`
    pub fn schedule_once<F>(&mut self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnMut(&mut Scene) + 'static,
    {
        self.insert(delay, None, Box::new(callback))
    }

    /// Run `callback` every `interval`, first after one interval
    ///
    /// A zero interval fires at most once per frame.
    pub fn schedule_repeating<F>(&mut self, interval: Duration, callback: F) -> TimerHandle
    where
        F: FnMut(&mut Scene) + 'static,
    {
        self.insert(interval, Some(interval), Box::new(callback))
    }

    /// Stop a timer; returns `false` when it already finished
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.timers.get_mut(handle) {
            Some(entry) if entry.callback.is_none() => {
                // Cancelled from inside its own callback
                entry.cancelled = true;
                true
            }
            Some(_) => self.timers.remove(handle).is_some(),
            None => false,
        }
    }

    /// Whether `handle` will still fire
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.get(handle).is_some_and(|e| !e.cancelled)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer is pending
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Count every timer down by `elapsed` and return the ones now due
    pub(crate) fn advance_all(&mut self, elapsed: Duration) -> Vec<TimerHandle> {
        let mut due = Vec::new();
        for (handle, entry) in &mut self.timers {
            entry.remaining = entry.remaining.saturating_sub(elapsed);
            if entry.remaining.is_zero() {
                due.push(handle);
            }
        }
        due
    }

    pub(crate) fn take_callback(&mut self, handle: TimerHandle) -> Option<TimerCallback> {
        self.timers.get_mut(handle)?.callback.take()
    }

    /// Put a fired callback back, or drop the timer if it was one-shot or
    /// cancelled while running
    pub(crate) fn finish(&mut self, handle: TimerHandle, callback: TimerCallback) {
        let Some(entry) = self.timers.get_mut(handle) else {
            return;
        };
        match entry.interval {
            Some(interval) if !entry.cancelled => {
                entry.remaining = interval;
                entry.callback = Some(callback);
            }
            _ => {
                self.timers.remove(handle);
            }
        }
    }

    fn insert(&mut self, delay: Duration, interval: Option<Duration>, callback: TimerCallback) -> TimerHandle {
        self.timers.insert(TimerEntry {
            remaining: delay,
            interval,
            callback: Some(callback),
            cancelled: false,
        })
    }
}
