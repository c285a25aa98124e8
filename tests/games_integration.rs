//! Screen flows of the bundled games, driven tick by tick.

use tickengine::error::GameError;
use tickengine::events::audio::AudioCmd;
use tickengine::game::{Flow, Game, ScreenKey};
use tickengine::games::ants::{self, AntsScreen};
use tickengine::games::invaders::{self, InvadersScreen};
use tickengine::games::platformer::{self, PlatformerScreen};
use tickengine::games::terminals::{self, TerminalsScreen};
use tickengine::resources::gameconfig::GameConfig;
use tickengine::resources::input::{InputState, Key};
use tickengine::resources::platform::Platform;
use tickengine::resources::surface::Surface;

#[derive(Default)]
struct NullPlatform {
    shutdowns: usize,
}

impl Platform for NullPlatform {
    fn poll_input(&mut self, _input: &mut InputState) {}

    fn elapsed_ms(&mut self) -> u32 {
        0
    }

    fn present(&mut self, _surface: &Surface, _audio: Vec<AudioCmd>) -> Result<(), GameError> {
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shutdowns += 1;
    }
}

fn config() -> GameConfig {
    let mut config = GameConfig::new();
    config.seed = Some(1234);
    config
}

/// Press and release `key` over one tick.
fn press<K: ScreenKey>(game: &mut Game<K>, key: Key, platform: &mut NullPlatform) -> Flow {
    game.input_mut().set_key(key, true);
    let flow = game.step(16, platform).unwrap();
    game.input_mut().set_key(key, false);
    flow
}

#[test]
fn ant_colony_runs_for_a_minute() {
    let mut platform = NullPlatform::default();
    let mut game = ants::build(&config()).unwrap();
    game.change_state(Some(ants::INITIAL_SCREEN), &mut platform)
        .unwrap();
    for _ in 0..1800 {
        assert_eq!(game.step(33, &mut platform).unwrap(), Flow::Continue);
    }
    assert_eq!(game.current(), Some(AntsScreen::Colony));
    assert!(game.surface().commands().len() > 1);
}

#[test]
fn invaders_menu_leads_to_play_after_the_countdown() {
    let mut platform = NullPlatform::default();
    let mut game = invaders::build(&config()).unwrap();
    game.change_state(Some(invaders::INITIAL_SCREEN), &mut platform)
        .unwrap();

    press(&mut game, Key::Space, &mut platform);
    assert_eq!(game.current(), Some(InvadersScreen::GetReady));

    game.step(2000, &mut platform).unwrap();
    assert_eq!(game.current(), Some(InvadersScreen::GetReady));
    game.step(1, &mut platform).unwrap();
    assert_eq!(game.current(), Some(InvadersScreen::Play));

    for _ in 0..30 {
        game.step(16, &mut platform).unwrap();
    }
    assert!(game.surface().commands().len() > 1);
}

#[test]
fn invaders_quit_item_shuts_down() {
    let mut platform = NullPlatform::default();
    let mut game = invaders::build(&config()).unwrap();
    game.change_state(Some(invaders::INITIAL_SCREEN), &mut platform)
        .unwrap();

    press(&mut game, Key::Down, &mut platform);
    assert_eq!(press(&mut game, Key::Enter, &mut platform), Flow::Exit);
    assert!(!game.is_running());
    assert_eq!(platform.shutdowns, 1);
}

#[test]
fn platformer_escape_returns_to_the_menu() {
    let mut platform = NullPlatform::default();
    let mut game = platformer::build(&config()).unwrap();
    game.change_state(Some(platformer::INITIAL_SCREEN), &mut platform)
        .unwrap();

    press(&mut game, Key::Enter, &mut platform);
    assert_eq!(game.current(), Some(PlatformerScreen::Play));

    game.input_mut().set_key(Key::Right, true);
    for _ in 0..60 {
        game.step(16, &mut platform).unwrap();
    }
    game.input_mut().set_key(Key::Right, false);

    press(&mut game, Key::Escape, &mut platform);
    assert_eq!(game.current(), Some(PlatformerScreen::MainMenu));
}

#[test]
fn terminals_start_plays_the_theme_and_runs_the_room() {
    let mut platform = NullPlatform::default();
    let mut game = terminals::build(&config()).unwrap();
    game.change_state(Some(terminals::INITIAL_SCREEN), &mut platform)
        .unwrap();

    press(&mut game, Key::Space, &mut platform);
    assert_eq!(game.current(), Some(TerminalsScreen::GetReady));
    game.step(2001, &mut platform).unwrap();
    assert_eq!(game.current(), Some(TerminalsScreen::Play));
    assert!(game.audio().pending().contains(&AudioCmd::PlayMusic {
        id: terminals::play::MUSIC.into(),
        looped: true
    }));

    for _ in 0..10 {
        game.step(16, &mut platform).unwrap();
    }
    assert_eq!(game.current(), Some(TerminalsScreen::Play));

    press(&mut game, Key::Escape, &mut platform);
    assert_eq!(game.current(), Some(TerminalsScreen::MainMenu));
}

#[test]
fn terminals_round_ends_with_results_then_game_over() {
    let mut platform = NullPlatform::default();
    let mut config = config();
    config.max_time_ms = 1000;
    config.hacker_count = 0;
    let mut game = terminals::build(&config).unwrap();
    game.change_state(Some(TerminalsScreen::Play), &mut platform)
        .unwrap();

    game.step(16, &mut platform).unwrap();
    game.step(1000, &mut platform).unwrap();
    assert_eq!(game.current(), Some(TerminalsScreen::Results));

    game.step(10_001, &mut platform).unwrap();
    assert_eq!(game.current(), Some(TerminalsScreen::GameOver));
    game.step(5001, &mut platform).unwrap();
    assert_eq!(game.current(), Some(TerminalsScreen::MainMenu));
}
