//! Ant colony simulation.
//!
//! No player: ants forage leaves and fight off spiders around their nest.
//!
//! - [`brain`] – ant states and their agent
//! - [`nest`] – the entity world and its per-tick processing
//! - [`screen`] – the screen wrapping the nest

pub mod brain;
pub mod nest;
pub mod screen;

use glam::Vec2;

use crate::error::GameError;
use crate::game::Game;
use crate::resources::assets::AssetManifest;
use crate::resources::gameconfig::GameConfig;
use crate::resources::surface::Color;

use nest::Nest;
use screen::ColonyScreen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntsScreen {
    Colony,
}

pub const INITIAL_SCREEN: AntsScreen = AntsScreen::Colony;

pub fn manifest() -> AssetManifest {
    AssetManifest::new()
        .texture("ant", "img/ant.png")
        .texture("leaf", "img/leaf.png")
        .texture("spider", "img/spider.png")
}

pub fn build(config: &GameConfig) -> Result<Game<AntsScreen>, GameError> {
    let (width, height) = config.window_size();
    let nest = Nest::new(
        Vec2::new(width as f32, height as f32),
        config.ant_count,
        config.rng(),
    )?;
    Game::new("Ants", width, height)
        .with_background(Color::WHITE)
        .with_assets(manifest())
        .with_screen(AntsScreen::Colony, ColonyScreen::new(nest))
}
