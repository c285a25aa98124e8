//! The backend seen from the game loop.
//!
//! Window management, image and audio decoding, input polling and drawing
//! live behind [`Platform`]. The raylib implementation is in
//! [`crate::systems::backend`]; tests use recording fakes.

use crate::error::GameError;
use crate::events::audio::AudioCmd;
use crate::resources::input::InputState;
use crate::resources::surface::Surface;

pub trait Platform {
    /// Drain pending input events into `input`. Called once per iteration.
    fn poll_input(&mut self, input: &mut InputState);

    /// Milliseconds since the previous call, from a monotonic clock.
    fn elapsed_ms(&mut self) -> u32;

    /// Show the frame and hand over the audio commands queued this tick.
    fn present(&mut self, surface: &Surface, audio: Vec<AudioCmd>) -> Result<(), GameError>;

    /// Wait out the rest of the frame budget.
    fn throttle(&mut self) {}

    /// Release window and audio resources. Called once, on the terminal
    /// transition.
    fn shutdown(&mut self);
}
