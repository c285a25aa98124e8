//! tickengine main entry point.
//!
//! Picks one of the four games from the command line, loads `config.ini`
//! (missing file or keys fall back to defaults), applies command line
//! overrides, opens the raylib window and runs the game until it quits.
//!
//! # Running
//!
//! ```sh
//! cargo run --release --features raylib -- invaders --seed 42
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

use tickengine::error::GameError;
use tickengine::game::{Game, ScreenKey};
use tickengine::games::{self, GameKind};
use tickengine::resources::gameconfig::GameConfig;
use tickengine::systems::backend::RaylibPlatform;

/// Four small arcade games on a fixed-tick engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Game to play.
    #[arg(value_enum)]
    game: GameKind,

    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "config.ini")]
    config: PathBuf,

    /// Directory holding img/ and sound/.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Target ticks per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for every random generator.
    #[arg(long)]
    seed: Option<u64>,
}

fn run<K: ScreenKey>(mut game: Game<K>, initial: K, config: &GameConfig) -> Result<(), GameError> {
    let mut platform = RaylibPlatform::open(
        game.title(),
        config.window_width,
        config.window_height,
        config.target_fps,
        game.assets(),
        &config.asset_root,
    )?;
    game.run(initial, &mut platform)
}

fn play(kind: GameKind, config: &GameConfig) -> Result<(), GameError> {
    match kind {
        GameKind::Ants => run(games::ants::build(config)?, games::ants::INITIAL_SCREEN, config),
        GameKind::Invaders => run(
            games::invaders::build(config)?,
            games::invaders::INITIAL_SCREEN,
            config,
        ),
        GameKind::Platformer => run(
            games::platformer::build(config)?,
            games::platformer::INITIAL_SCREEN,
            config,
        ),
        GameKind::Terminals => run(
            games::terminals::build(config)?,
            games::terminals::INITIAL_SCREEN,
            config,
        ),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if let Some(assets) = cli.assets {
        config.asset_root = assets;
    }
    if let Some(fps) = cli.fps {
        config.target_fps = fps;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    info!("starting {:?}", cli.game);
    if let Err(e) = play(cli.game, &config) {
        error!("{}", e);
        std::process::exit(1);
    }
}
