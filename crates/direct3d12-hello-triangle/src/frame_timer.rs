use std::time::{Duration, Instant};

use tracing::{debug, trace};

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Measures the time between presented frames.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Instant,
    window_start: Instant,
    frames_in_window: u32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            window_start: now,
            frames_in_window: 0,
        }
    }

    /// Marks the end of a frame and logs the frame rate.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = self.tick_at(now);
        trace!(fps = frames_per_second(delta), "frame");
        if let Some(average) = self.take_average(now) {
            debug!(fps = format_args!("{average:.1}"), "frame rate");
        }
        delta
    }

    fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames_in_window += 1;
        delta
    }

    /// Average fps over the current window, once the window is long enough.
    fn take_average(&mut self, now: Instant) -> Option<f64> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < REPORT_INTERVAL {
            return None;
        }
        let average = f64::from(self.frames_in_window) / elapsed.as_secs_f64();
        self.window_start = now;
        self.frames_in_window = 0;
        Some(average)
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Instantaneous frame rate for one frame time; 0 for a zero-length frame.
pub fn frames_per_second(delta: Duration) -> f64 {
    let seconds = delta.as_secs_f64();
    if seconds > 0.0 { 1.0 / seconds } else { 0.0 }
}
