//! Space invaders.
//!
//! Screen flow:
//!
//! ```text
//! MainMenu -> GetReady -> Play -> LevelUp -> Play ...
//!                   ^       |
//!                   +-------+ (ship hit)
//!                           +-> GameOver -> MainMenu
//! ```

pub mod bullets;
pub mod explosion;
pub mod play;
pub mod player;
pub mod swarm;

use glam::Vec2;

use crate::error::GameError;
use crate::game::Game;
use crate::games::font;
use crate::resources::assets::AssetManifest;
use crate::resources::gameconfig::GameConfig;
use crate::screens::interstitial::Interstitial;
use crate::screens::menu::{MainMenu, MenuAction};

use play::PlayScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvadersScreen {
    MainMenu,
    GetReady,
    Play,
    LevelUp,
    GameOver,
}

pub const INITIAL_SCREEN: InvadersScreen = InvadersScreen::MainMenu;

pub fn manifest() -> AssetManifest {
    AssetManifest::new()
        .texture("font", "img/fasttracker2-style_12x12.png")
        .texture("invaders", "img/invaders.png")
        .texture("ship", "img/ship.png")
        .texture("bullet", "img/bullet.png")
        .texture("alienbullet", "img/alienbullet.png")
        .texture("explosion", "img/explosion.png")
        .sound("playershoot", "sound/playershoot.wav")
        .sound("aliendie", "sound/aliendie.wav")
        .sound("playerdie", "sound/playerdie.wav")
}

pub fn build(config: &GameConfig) -> Result<Game<InvadersScreen>, GameError> {
    let (width, height) = config.window_size();
    let screen = Vec2::new(width as f32, height as f32);
    let menu = MainMenu::new("Invaders! From Space", font())
        .item("Start game", MenuAction::Goto(InvadersScreen::GetReady))
        .item("Quit", MenuAction::Quit);
    let play = PlayScreen::new(screen, config.invader_lives, config.swarm_speed_ms, font())?;

    Game::new("Invaders", width, height)
        .with_assets(manifest())
        .with_screen(InvadersScreen::MainMenu, menu)?
        .with_screen(
            InvadersScreen::GetReady,
            Interstitial::new("Get ready!!", 2000, Some(InvadersScreen::Play), font()),
        )?
        .with_screen(InvadersScreen::Play, play)?
        .with_screen(
            InvadersScreen::LevelUp,
            Interstitial::new(
                "Congratulations! Level up",
                2000,
                Some(InvadersScreen::Play),
                font(),
            ),
        )?
        .with_screen(
            InvadersScreen::GameOver,
            Interstitial::new(
                "G A M E  O V E R !",
                5000,
                Some(InvadersScreen::MainMenu),
                font(),
            ),
        )
}
