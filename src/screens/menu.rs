//! Keyboard driven main menu shared by the games.
//!
//! Up and down move the selection with a 250 ms repeat delay and wrap around
//! at both ends. Space or Enter activates the selected item.

use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::surface::Surface;

/// Delay between two selection moves while a direction key is held.
pub const INPUT_REPEAT_MS: i64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction<K> {
    Goto(K),
    Quit,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuLayout {
    pub title_y: f32,
    pub items_y: f32,
    pub spacing: f32,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            title_y: 48.0,
            items_y: 280.0,
            spacing: 24.0,
        }
    }
}

pub struct MainMenu<K> {
    title: String,
    items: Vec<(String, MenuAction<K>)>,
    selected: usize,
    input_tick: i64,
    font: BitmapFont,
    layout: MenuLayout,
    background: Option<String>,
}

impl<K: Copy> MainMenu<K> {
    pub fn new(title: impl Into<String>, font: BitmapFont) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            selected: 0,
            input_tick: 0,
            font,
            layout: MenuLayout::default(),
            background: None,
        }
    }

    pub fn item(mut self, label: impl Into<String>, action: MenuAction<K>) -> Self {
        self.items.push((label.into(), action));
        self
    }

    pub fn with_layout(mut self, layout: MenuLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_background(mut self, texture: impl Into<String>) -> Self {
        self.background = Some(texture.into());
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(label, _)| label.as_str())
    }

    fn move_selection(&mut self, up: bool) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        self.selected = if up {
            (self.selected + len - 1) % len
        } else {
            (self.selected + 1) % len
        };
    }
}

impl<K: Copy> GameState<K> for MainMenu<K> {
    fn on_enter(&mut self, _previous: Option<K>, _audio: &mut AudioQueue) {
        self.input_tick = 0;
    }

    fn update(&mut self, tick: &mut Tick<'_>) -> Result<Option<Transition<K>>, GameError> {
        let (up, down) = (tick.input.up(), tick.input.down());
        if (up || down) && self.input_tick == 0 {
            self.input_tick = INPUT_REPEAT_MS;
            self.move_selection(up);
        } else if self.input_tick > 0 {
            self.input_tick = (self.input_tick - tick.elapsed_ms as i64).max(0);
        }

        if tick.input.confirm_pressed()
            && let Some((_, action)) = self.items.get(self.selected)
        {
            return Ok(Some(match *action {
                MenuAction::Goto(key) => Transition::Change(key),
                MenuAction::Quit => Transition::Quit,
            }));
        }
        Ok(None)
    }

    fn draw(&mut self, surface: &mut Surface) {
        if let Some(background) = &self.background {
            surface.blit(background, surface.bounds());
        }
        self.font.centre(surface, &self.title, self.layout.title_y);
        for (i, (label, _)) in self.items.iter().enumerate() {
            let marker = if i == self.selected { "> " } else { "  " };
            let y = self.layout.items_y + i as f32 * self.layout.spacing;
            self.font.centre(surface, &format!("{}{}", marker, label), y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::{InputState, Key};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screen {
        Play,
    }

    fn menu() -> MainMenu<Screen> {
        MainMenu::new("Invaders", BitmapFont::new("font", 12, 16))
            .item("Start game", MenuAction::Goto(Screen::Play))
            .item("Quit", MenuAction::Quit)
    }

    fn tick(
        menu: &mut MainMenu<Screen>,
        input: &InputState,
        elapsed_ms: u32,
    ) -> Option<Transition<Screen>> {
        let mut audio = AudioQueue::new();
        let mut t = Tick {
            elapsed_ms,
            pointer: None,
            input,
            audio: &mut audio,
        };
        menu.update(&mut t).unwrap()
    }

    #[test]
    fn test_held_key_repeats_after_delay() {
        let mut m = menu();
        let mut input = InputState::default();
        input.set_key(Key::Down, true);

        tick(&mut m, &input, 33);
        assert_eq!(m.selected(), 1);
        // held: counts the delay down to zero without moving
        for _ in 0..8 {
            tick(&mut m, &input, 33);
        }
        assert_eq!(m.selected(), 1);
        tick(&mut m, &input, 33);
        assert_eq!(m.selected(), 0);
    }

    #[test]
    fn test_up_wraps_to_last_item() {
        let mut m = menu();
        let mut input = InputState::default();
        input.set_key(Key::Up, true);
        tick(&mut m, &input, 10);
        assert_eq!(m.selected(), 1);
    }

    #[test]
    fn test_confirm_selects_action() {
        let mut m = menu();
        let mut input = InputState::default();
        input.set_key(Key::Space, true);
        assert!(matches!(
            tick(&mut m, &input, 10),
            Some(Transition::Change(Screen::Play))
        ));

        let mut input = InputState::default();
        input.set_key(Key::Down, true);
        tick(&mut m, &input, 10);
        input.set_key(Key::Enter, true);
        assert!(matches!(tick(&mut m, &input, 10), Some(Transition::Quit)));
    }

    #[test]
    fn test_holding_confirm_does_not_retrigger() {
        let mut m = menu();
        let mut input = InputState::default();
        input.set_key(Key::Space, true);
        input.settle();
        assert!(tick(&mut m, &input, 10).is_none());
    }
}
