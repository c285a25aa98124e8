//! Defend the terminals.
//!
//! Hackers roam a server room and hack terminals; the player drops sandbox
//! traps and fights hackers at their keyboards through a pipe puzzle.
//!
//! ```text
//! MainMenu -> GetReady -> Play <-> PipeGame
//!                          ^          |
//!                          +-- HackerStopped
//! Play -> Results -> GameOver -> MainMenu
//! ```
//!
//! Escape in play goes back to the menu, where "Resume" continues the round.

pub mod hacker;
pub mod pipes;
pub mod pipescreen;
pub mod play;
pub mod player;
pub mod room;
pub mod terminal;

use glam::Vec2;

use crate::error::GameError;
use crate::game::Game;
use crate::games::font;
use crate::resources::assets::AssetManifest;
use crate::resources::gameconfig::GameConfig;
use crate::screens::interstitial::Interstitial;
use crate::screens::menu::{MainMenu, MenuAction};

use pipes::BOARD_SIZE;
use pipescreen::PipeScreen;
use play::{PlayScreen, RoomSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalsScreen {
    MainMenu,
    GetReady,
    Play,
    PipeGame,
    HackerStopped,
    /// Built when a round ends; the message depends on the outcome.
    Results,
    GameOver,
}

pub const INITIAL_SCREEN: TerminalsScreen = TerminalsScreen::MainMenu;

pub fn manifest() -> AssetManifest {
    AssetManifest::new()
        .texture("font", "img/fasttracker2-style_12x12.png")
        .texture("menu", "img/british-library-14880.jpg")
        .texture("floor", "img/industrial_floor.png")
        .texture("terminal", "img/CommTerminal.png")
        .texture("player", "img/gym_leader_cheryl_transparent_background.png")
        .texture("hacker", "img/24by24ModernRPGGuy.png")
        .texture("sandbox", "img/moving_pikes.png")
        .texture("life", "img/male_ivory_lizard_head.png")
        .sound("hackeralert", "sound/hackeralert.ogg")
        .sound("hacking", "sound/hackingnoise-shorter.wav")
        .sound("sandbox", "sound/playershoot.wav")
        .music(play::MUSIC, "sound/reggame-v2.mp3")
}

pub fn build(config: &GameConfig) -> Result<Game<TerminalsScreen>, GameError> {
    let (width, height) = config.window_size();
    let screen = Vec2::new(width as f32, height as f32);
    let mut rng = config.rng();

    let menu = MainMenu::new("Regina Quest!", font())
        .with_background("menu")
        .item("Start", MenuAction::Goto(TerminalsScreen::GetReady))
        .item("Resume", MenuAction::Goto(TerminalsScreen::Play))
        .item("Quit", MenuAction::Quit);
    let play = PlayScreen::new(
        RoomSettings {
            size: screen,
            terminals: config.terminal_count,
            hackers: config.hacker_count,
            max_time_ms: config.max_time_ms,
        },
        fastrand::Rng::with_seed(rng.u64(..)),
        font(),
    )?;
    let pipes = PipeScreen::new(
        BOARD_SIZE,
        screen,
        fastrand::Rng::with_seed(rng.u64(..)),
        font(),
    )?;

    Game::new("Terminals", width, height)
        .with_assets(manifest())
        .with_screen(TerminalsScreen::MainMenu, menu)?
        .with_screen(
            TerminalsScreen::GetReady,
            Interstitial::new(
                "Defend the terminals!\n\nGet ready!!",
                2000,
                Some(TerminalsScreen::Play),
                font(),
            ),
        )?
        .with_screen(TerminalsScreen::Play, play)?
        .with_screen(TerminalsScreen::PipeGame, pipes)?
        .with_screen(
            TerminalsScreen::HackerStopped,
            Interstitial::new("Hacker stopped!", 4500, Some(TerminalsScreen::Play), font()),
        )?
        .with_screen(
            TerminalsScreen::GameOver,
            Interstitial::new(
                "G A M E  O V E R !",
                5000,
                Some(TerminalsScreen::MainMenu),
                font(),
            ),
        )
}
