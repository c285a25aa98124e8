//! The four games built on the engine.
//!
//! Each game module exposes its screen key enum, an `INITIAL_SCREEN`, the
//! asset `manifest` and a `build` function turning a [`GameConfig`] into a
//! ready [`Game`](crate::game::Game).
//!
//! [`GameConfig`]: crate::resources::gameconfig::GameConfig

pub mod ants;
pub mod invaders;
pub mod platformer;
pub mod terminals;

use clap::ValueEnum;

use crate::resources::bitmapfont::BitmapFont;

/// Games selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Ants,
    Invaders,
    Platformer,
    Terminals,
}

/// The 12x12 bitmap font every game uses.
pub fn font() -> BitmapFont {
    BitmapFont::new("font", 12, 16)
}
