/// Millisecond countdown shared by screens and game objects.
///
/// `remaining` may go negative: several screens fire only once the timer is
/// strictly below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub duration: i64,
    pub remaining: i64,
}

impl Countdown {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration: duration_ms as i64,
            remaining: duration_ms as i64,
        }
    }

    /// A countdown that has already run out.
    pub fn expired() -> Self {
        Self {
            duration: 0,
            remaining: 0,
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    pub fn restart(&mut self, duration_ms: u32) {
        self.duration = duration_ms as i64;
        self.remaining = self.duration;
    }

    pub fn tick(&mut self, elapsed_ms: u32) {
        self.remaining -= elapsed_ms as i64;
    }

    /// Reached zero or below.
    pub fn is_done(&self) -> bool {
        self.remaining <= 0
    }

    /// Strictly below zero.
    pub fn is_overdue(&self) -> bool {
        self.remaining < 0
    }
}
