//! Side-scrolling platformer.
//!
//! `MainMenu -> Play -> Complete ("You made it!") -> MainMenu`. Escape in play
//! goes back to the menu.

pub mod level;
pub mod play;
pub mod player;

use glam::Vec2;

use crate::error::GameError;
use crate::game::Game;
use crate::games::font;
use crate::resources::assets::AssetManifest;
use crate::resources::gameconfig::GameConfig;
use crate::screens::interstitial::Interstitial;
use crate::screens::menu::{MainMenu, MenuAction};

use level::{LevelSpec, builtin_levels, load_levels};
use play::PlayScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerScreen {
    MainMenu,
    Play,
    Complete,
}

pub const INITIAL_SCREEN: PlatformerScreen = PlatformerScreen::MainMenu;

/// Shared textures plus one background per level, `img/<key>.png`.
pub fn manifest(levels: &[LevelSpec]) -> AssetManifest {
    let mut manifest = AssetManifest::new()
        .texture("font", "img/fasttracker2-style_12x12.png")
        .texture("tiles", "img/tiles_spritesheet.png")
        .texture("player", "img/p1_walk.png");
    for level in levels {
        if !manifest.has_texture(&level.background) {
            manifest = manifest.texture(&level.background, &format!("img/{}.png", level.background));
        }
    }
    manifest
}

pub fn build(config: &GameConfig) -> Result<Game<PlatformerScreen>, GameError> {
    let levels = match &config.platformer_levels {
        Some(path) => load_levels(path)?,
        None => builtin_levels(),
    };
    let (width, height) = config.window_size();
    let menu = MainMenu::new("Platformer", font())
        .item("Start", MenuAction::Goto(PlatformerScreen::Play))
        .item("Quit", MenuAction::Quit);
    let assets = manifest(&levels);
    let play = PlayScreen::new(levels, Vec2::new(width as f32, height as f32), font())?;

    Game::new("Platformer", width, height)
        .with_assets(assets)
        .with_screen(PlatformerScreen::MainMenu, menu)?
        .with_screen(PlatformerScreen::Play, play)?
        .with_screen(
            PlatformerScreen::Complete,
            Interstitial::new("You made it!", 3000, Some(PlatformerScreen::MainMenu), font()),
        )
}
