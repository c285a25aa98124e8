//! Game configuration.
//!
//! Settings loaded from an INI configuration file. Every value has a safe
//! default, so a missing file or a missing key never stops a game from
//! starting. Command line flags are applied on top by `main`.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! target_fps = 30
//! title = tickengine
//!
//! [assets]
//! root = ./assets
//!
//! [sim]
//! seed = 42
//!
//! [ants]
//! count = 20
//!
//! [invaders]
//! lives = 3
//! swarm_speed = 500
//!
//! [terminals]
//! terminals = 3
//! hackers = 2
//! max_time_ms = 120000
//!
//! [platformer]
//! levels = ./assets/levels.json
//! ```

use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::GameError;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 30;
const DEFAULT_TITLE: &str = "tickengine";
const DEFAULT_ASSET_ROOT: &str = "./assets";
const DEFAULT_ANT_COUNT: usize = 20;
const DEFAULT_INVADER_LIVES: u32 = 3;
const DEFAULT_SWARM_SPEED_MS: u32 = 500;
const DEFAULT_TERMINALS: usize = 3;
const DEFAULT_HACKERS: usize = 2;
const DEFAULT_MAX_TIME_MS: u32 = 120_000;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels; also the logical screen width.
    pub window_width: u32,
    /// Window height in pixels; also the logical screen height.
    pub window_height: u32,
    /// Target ticks per second.
    pub target_fps: u32,
    pub title: String,
    /// Directory asset paths are resolved against.
    pub asset_root: PathBuf,
    /// Fixed seed for every random generator; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub ant_count: usize,
    pub invader_lives: u32,
    /// Initial swarm frame time in milliseconds.
    pub swarm_speed_ms: u32,
    pub terminal_count: usize,
    pub hacker_count: usize,
    /// Length of a terminals round in milliseconds.
    pub max_time_ms: u32,
    /// JSON file replacing the built-in platformer levels.
    pub platformer_levels: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            seed: None,
            ant_count: DEFAULT_ANT_COUNT,
            invader_lives: DEFAULT_INVADER_LIVES,
            swarm_speed_ms: DEFAULT_SWARM_SPEED_MS,
            terminal_count: DEFAULT_TERMINALS,
            hacker_count: DEFAULT_HACKERS,
            max_time_ms: DEFAULT_MAX_TIME_MS,
            platformer_levels: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    pub fn load_from_file(&mut self) -> Result<(), GameError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| GameError::Config(format!("failed to load config file: {}", e)))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "root") {
            self.asset_root = PathBuf::from(root);
        }

        // [sim] section
        if let Some(seed) = config.getuint("sim", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        // per-game sections
        if let Some(count) = config.getuint("ants", "count").ok().flatten() {
            self.ant_count = count as usize;
        }
        if let Some(lives) = config.getuint("invaders", "lives").ok().flatten() {
            self.invader_lives = lives as u32;
        }
        if let Some(speed) = config.getuint("invaders", "swarm_speed").ok().flatten() {
            self.swarm_speed_ms = speed as u32;
        }
        if let Some(count) = config.getuint("terminals", "terminals").ok().flatten() {
            self.terminal_count = count as usize;
        }
        if let Some(count) = config.getuint("terminals", "hackers").ok().flatten() {
            self.hacker_count = count as usize;
        }
        if let Some(ms) = config.getuint("terminals", "max_time_ms").ok().flatten() {
            self.max_time_ms = ms as u32;
        }
        if let Some(levels) = config.get("platformer", "levels") {
            self.platformer_levels = Some(PathBuf::from(levels));
        }

        info!(
            "Loaded config: {}x{} window, fps={}, assets={:?}, seed={:?}",
            self.window_width, self.window_height, self.target_fps, self.asset_root, self.seed
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), GameError> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "title", Some(self.title.clone()));
        config.set(
            "assets",
            "root",
            Some(self.asset_root.to_string_lossy().into_owned()),
        );
        if let Some(seed) = self.seed {
            config.set("sim", "seed", Some(seed.to_string()));
        }
        config.set("ants", "count", Some(self.ant_count.to_string()));
        config.set("invaders", "lives", Some(self.invader_lives.to_string()));
        config.set(
            "invaders",
            "swarm_speed",
            Some(self.swarm_speed_ms.to_string()),
        );
        config.set(
            "terminals",
            "terminals",
            Some(self.terminal_count.to_string()),
        );
        config.set("terminals", "hackers", Some(self.hacker_count.to_string()));
        config.set(
            "terminals",
            "max_time_ms",
            Some(self.max_time_ms.to_string()),
        );
        if let Some(levels) = &self.platformer_levels {
            config.set(
                "platformer",
                "levels",
                Some(levels.to_string_lossy().into_owned()),
            );
        }

        config
            .write(&self.config_path)
            .map_err(|e| GameError::Config(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Frame budget in milliseconds for the target tick rate.
    pub fn frame_budget_ms(&self) -> u32 {
        1000 / self.target_fps.max(1)
    }

    /// Random generator honouring the configured seed.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }

    /// Resolve an asset path against the asset root.
    pub fn asset_path(&self, relative: &str) -> PathBuf {
        self.asset_root.join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ini(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tickengine-{}-{}.ini",
            name,
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::new();
        assert_eq!(cfg.window_size(), (800, 600));
        assert_eq!(cfg.target_fps, 30);
        assert_eq!(cfg.frame_budget_ms(), 33);
        assert_eq!(cfg.ant_count, 20);
        assert_eq!(cfg.terminal_count, 3);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error_and_keeps_defaults() {
        let mut cfg = GameConfig::with_path("/definitely/not/here/config.ini");
        assert!(matches!(cfg.load_from_file(), Err(GameError::Config(_))));
        assert_eq!(cfg.window_width, 800);
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let path = temp_ini(
            "partial",
            "[window]\nwidth = 640\nheight = 480\n\n[sim]\nseed = 42\n\n[ants]\ncount = 5\n",
        );
        let mut cfg = GameConfig::with_path(&path);
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.window_size(), (640, 480));
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.ant_count, 5);
        assert_eq!(cfg.target_fps, 30);
        assert_eq!(cfg.hacker_count, 2);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_saved_file_loads_back() {
        let path = temp_ini("saved", "");
        let mut cfg = GameConfig::with_path(&path);
        cfg.hacker_count = 4;
        cfg.seed = Some(7);
        cfg.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.hacker_count, 4);
        assert_eq!(loaded.seed, Some(7));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut cfg = GameConfig::new();
        cfg.seed = Some(99);
        let a: Vec<u32> = {
            let mut r = cfg.rng();
            (0..5).map(|_| r.u32(..)).collect()
        };
        let b: Vec<u32> = {
            let mut r = cfg.rng();
            (0..5).map(|_| r.u32(..)).collect()
        };
        assert_eq!(a, b);
    }
}
