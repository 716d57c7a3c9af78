//! Time management utilities

use std::time::{Duration, Instant};

/// Frame pacer for the main loop
///
/// [`FrameClock::tick`] blocks until at least `1 / max_fps` seconds have
/// passed since the previous tick, then reports the real elapsed time.
/// Elapsed time is not clamped unless a maximum was configured, so a long
/// stall (debugger pause, minimized window) produces one large step.
pub struct FrameClock {
    last_tick: Instant,
    frame_period: Duration,
    max_frame_time: Option<Duration>,
    delta: Duration,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock targeting `max_fps` frames per second
    ///
    /// A rate of zero is treated as one frame per second.
    pub fn new(max_fps: u32) -> Self {
        Self {
            last_tick: Instant::now(),
            frame_period: Duration::from_secs(1) / max_fps.max(1),
            max_frame_time: None,
            delta: Duration::ZERO,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Clamp reported elapsed time to `max`
    #[must_use]
    pub fn with_max_frame_time(mut self, max: Option<Duration>) -> Self {
        self.max_frame_time = max;
        self
    }

    /// Minimum spacing between two ticks
    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// Restart the baseline from now
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Wait for the next frame slot and return the elapsed seconds
    pub fn tick(&mut self) -> f32 {
        let deadline = self.last_tick + self.frame_period;
        let mut now = Instant::now();
        while now < deadline {
            std::thread::sleep(deadline - now);
            now = Instant::now();
        }

        let mut elapsed = now.duration_since(self.last_tick);
        if let Some(max) = self.max_frame_time {
            elapsed = elapsed.min(max);
        }

        self.last_tick = now;
        self.delta = elapsed;
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Timestamp of the last tick
    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }

    /// Elapsed time reported by the last tick
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Elapsed seconds reported by the last tick
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Sum of all reported elapsed times
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of ticks so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since the clock was created
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
