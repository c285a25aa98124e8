//! Monotonic frame clock.
//!
//! Measures the wall time between loop iterations and sleeps the remainder
//! of the frame budget. A slow frame is reported as it is: the elapsed value
//! is never capped, so the simulation takes a larger step instead of
//! dropping frames.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_start: Instant,
    budget: Duration,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            last: now,
            frame_start: now,
            budget: Duration::from_millis(1000 / target_fps.max(1) as u64),
        }
    }

    /// Milliseconds since the previous call (or since construction).
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.frame_start = now;
        elapsed.as_millis().min(u32::MAX as u128) as u32
    }

    /// Sleep until the frame budget measured from the last `tick` is used up.
    pub fn throttle(&self) {
        let spent = self.frame_start.elapsed();
        if spent < self.budget {
            std::thread::sleep(self.budget - spent);
        }
    }

    pub fn budget_ms(&self) -> u32 {
        self.budget.as_millis() as u32
    }
}
