//! The animation clock.
//!
//! [`Time`] tracks wall-clock frame timing (delta, FPS, pause) for the window
//! loop. [`RateLimiter`] turns that wall-clock time into a bounded number of
//! fixed simulation ticks per frame, so the simulation runs at most
//! `tick_rate` ticks per second no matter how fast frames are presented.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use bouncebox::time::RateLimiter;
//!
//! let mut limiter = RateLimiter::new(200);
//! // 20ms of wall time at 200 ticks/s is four ticks
//! assert_eq!(limiter.ticks_due(Duration::from_millis(20)), 4);
//! ```

use std::time::{Duration, Instant};

/// Frame clock for the window loop.
///
/// Measures wall-clock time between frames, scaled by a playback speed and
/// frozen while paused, and keeps a running FPS estimate.
#[derive(Debug)]
pub struct Time {
    last_frame: Instant,
    /// Scaled time since the previous frame; zero while paused.
    delta: Duration,
    /// Scaled wall time accumulated over unpaused frames.
    elapsed: Duration,
    frame: u64,
    fps: f32,
    fps_window_start: Instant,
    fps_window_frames: u64,
    paused: bool,
    time_scale: f32,
}

impl Time {
    const FPS_WINDOW: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame: 0,
            fps: 0.0,
            fps_window_start: now,
            fps_window_frames: 0,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Mark the start of a new frame. Call once per redraw.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frame += 1;

        self.delta = if self.paused {
            Duration::ZERO
        } else {
            raw.mul_f32(self.time_scale)
        };
        self.elapsed += self.delta;

        self.fps_window_frames += 1;
        let window = now.duration_since(self.fps_window_start);
        if window >= Self::FPS_WINDOW {
            self.fps = self.fps_window_frames as f32 / window.as_secs_f32();
            self.fps_window_frames = 0;
            self.fps_window_start = now;
        }
    }

    /// Scaled seconds since the previous frame.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    #[inline]
    pub fn delta_duration(&self) -> Duration {
        self.delta
    }

    /// Scaled seconds of unpaused time since creation or the last reset.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Frames seen since creation or the last reset.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the playback speed. Negative values clamp to zero.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Restart the clock from now, keeping pause state and time scale.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.delta = Duration::ZERO;
        self.elapsed = Duration::ZERO;
        self.frame = 0;
        self.fps = 0.0;
        self.fps_window_start = now;
        self.fps_window_frames = 0;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-rate tick scheduler.
///
/// Converts elapsed wall-clock time into whole simulation ticks. Leftover time
/// carries over to the next call. At most `max_catch_up` ticks are released
/// per call; any backlog beyond that is discarded so a stalled frame slows the
/// simulation down rather than fast-forwarding it.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tick_rate: u32,
    interval: Duration,
    accumulator: Duration,
    max_catch_up: u32,
    next_deadline: Option<Instant>,
}

impl RateLimiter {
    /// Limit to `tick_rate` ticks per second (at least one).
    pub fn new(tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        Self {
            tick_rate,
            interval: Duration::from_secs(1) / tick_rate,
            accumulator: Duration::ZERO,
            max_catch_up: tick_rate.div_ceil(10).max(1),
            next_deadline: None,
        }
    }

    /// Set the most ticks a single call to [`ticks_due`](Self::ticks_due) may release.
    pub fn with_max_catch_up(mut self, max: u32) -> Self {
        self.max_catch_up = max.max(1);
        self
    }

    #[inline]
    pub fn tick_rate(&self) -> u32 {
        self.tick_rate
    }

    /// Wall-clock time between ticks.
    #[inline]
    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    /// Add `elapsed` wall-clock time and return how many ticks should run now.
    pub fn ticks_due(&mut self, elapsed: Duration) -> u32 {
        self.ticks_due_at(elapsed, 1.0)
    }

    /// Like [`ticks_due`](Self::ticks_due) for a clock running at `speed`
    /// times real time. `elapsed` is already scaled; the catch-up cap grows
    /// with the speed so fast playback is not throttled back to the cap.
    pub fn ticks_due_at(&mut self, elapsed: Duration, speed: f32) -> u32 {
        self.accumulator += elapsed;

        let cap = (self.max_catch_up as f32 * speed.max(1.0)).ceil() as u32;
        let due = self.accumulator.as_nanos() / self.interval.as_nanos();
        if due > cap as u128 {
            self.accumulator = Duration::ZERO;
            return cap;
        }

        let due = due as u32;
        self.accumulator -= self.interval * due;
        due
    }

    /// Block until the next tick is due.
    ///
    /// Used by loops without a frame clock. The first call returns
    /// immediately; later calls sleep so that ticks are spaced by the interval.
    pub fn wait_next(&mut self) {
        let now = Instant::now();
        let deadline = match self.next_deadline {
            Some(deadline) if deadline > now => {
                std::thread::sleep(deadline - now);
                deadline
            }
            // running late (or first tick): resynchronise instead of bursting
            _ => now,
        };
        self.next_deadline = Some(deadline + self.interval);
    }

    /// Drop any carried-over time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.next_deadline = None;
    }
}
