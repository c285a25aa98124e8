//! Timed message screen ("Get ready!", "Level up", "Game over"...).

use crate::components::timer::Countdown;
use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::surface::Surface;

/// Shows a centred message, then moves on to `next` once the wait time has
/// run out. With no `next` the application quits.
pub struct Interstitial<K> {
    message: String,
    timer: Countdown,
    next: Option<K>,
    font: BitmapFont,
}

impl<K: Copy> Interstitial<K> {
    pub fn new(message: impl Into<String>, wait_ms: u32, next: Option<K>, font: BitmapFont) -> Self {
        Self {
            message: message.into(),
            timer: Countdown::new(wait_ms),
            next,
            font,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl<K: Copy> GameState<K> for Interstitial<K> {
    fn on_enter(&mut self, _previous: Option<K>, _audio: &mut AudioQueue) {
        self.timer.reset();
    }

    fn update(&mut self, tick: &mut Tick<'_>) -> Result<Option<Transition<K>>, GameError> {
        self.timer.tick(tick.elapsed_ms);
        if !self.timer.is_overdue() {
            return Ok(None);
        }
        Ok(Some(match self.next {
            Some(key) => Transition::Change(key),
            None => Transition::Quit,
        }))
    }

    fn draw(&mut self, surface: &mut Surface) {
        self.font.centre_block(surface, &self.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::InputState;

    fn step(screen: &mut Interstitial<u8>, elapsed_ms: u32) -> Option<Transition<u8>> {
        let input = InputState::default();
        let mut audio = AudioQueue::new();
        let mut tick = Tick {
            elapsed_ms,
            pointer: None,
            input: &input,
            audio: &mut audio,
        };
        screen.update(&mut tick).unwrap()
    }

    #[test]
    fn test_waits_until_below_zero() {
        let mut s = Interstitial::new("Get ready!!", 2000, Some(3u8), BitmapFont::new("f", 12, 16));
        s.on_enter(None, &mut AudioQueue::new());
        assert!(step(&mut s, 1000).is_none());
        assert!(step(&mut s, 1000).is_none());
        assert!(matches!(step(&mut s, 1), Some(Transition::Change(3))));
    }

    #[test]
    fn test_timer_restarts_on_every_enter() {
        let mut s = Interstitial::new("Level up", 100, Some(1u8), BitmapFont::new("f", 12, 16));
        s.on_enter(None, &mut AudioQueue::new());
        assert!(step(&mut s, 150).is_some());
        s.on_enter(Some(2), &mut AudioQueue::new());
        assert!(step(&mut s, 50).is_none());
    }

    #[test]
    fn test_no_next_quits() {
        let mut s: Interstitial<u8> = Interstitial::new("Bye", 0, None, BitmapFont::new("f", 12, 16));
        s.on_enter(None, &mut AudioQueue::new());
        assert!(matches!(step(&mut s, 1), Some(Transition::Quit)));
    }
}
