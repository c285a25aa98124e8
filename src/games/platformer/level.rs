//! Platformer levels.
//!
//! A level is a list of static blocks and moving platforms in world
//! coordinates plus a horizontal scroll offset. Levels are described by
//! [`LevelSpec`], which is what the optional JSON level file contains:
//!
//! ```json
//! [
//!   {
//!     "background": "background_01",
//!     "limit": -2500,
//!     "blocks": [{ "tile": "GrassLeft", "x": 500, "y": 500 }],
//!     "movers": [{ "tile": "StoneMiddle", "x": 1350, "y": 280, "dx": 1, "left": 1350, "right": 1600 }]
//!   }
//! ]
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::rect::Rect;
use crate::error::GameError;

/// Tiles of the platform sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    GrassLeft,
    GrassMiddle,
    GrassRight,
    StoneLeft,
    StoneMiddle,
    StoneRight,
}

impl Tile {
    /// Region of the tile in the sheet; its size is the block size.
    pub fn source(&self) -> Rect {
        match self {
            Tile::GrassLeft => Rect::new(576.0, 720.0, 70.0, 70.0),
            Tile::GrassRight => Rect::new(576.0, 576.0, 70.0, 70.0),
            Tile::GrassMiddle => Rect::new(504.0, 576.0, 70.0, 70.0),
            Tile::StoneLeft => Rect::new(432.0, 720.0, 70.0, 40.0),
            Tile::StoneMiddle => Rect::new(648.0, 648.0, 70.0, 40.0),
            Tile::StoneRight => Rect::new(792.0, 648.0, 70.0, 40.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub tile: Tile,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoverSpec {
    pub tile: Tile,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
    #[serde(default)]
    pub left: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub background: String,
    /// The level is complete once the player's world x drops below this.
    pub limit: f32,
    #[serde(default)]
    pub blocks: Vec<BlockSpec>,
    #[serde(default)]
    pub movers: Vec<MoverSpec>,
}

fn block(tile: Tile, x: f32, y: f32) -> BlockSpec {
    BlockSpec { tile, x, y }
}

/// The two levels shipped with the game.
pub fn builtin_levels() -> Vec<LevelSpec> {
    use Tile::*;

    let shared = [
        block(GrassLeft, 800.0, 400.0),
        block(GrassMiddle, 870.0, 400.0),
        block(GrassRight, 940.0, 400.0),
        block(GrassLeft, 1000.0, 500.0),
        block(GrassMiddle, 1070.0, 500.0),
        block(GrassRight, 1140.0, 500.0),
        block(StoneLeft, 1120.0, 280.0),
        block(StoneMiddle, 1190.0, 280.0),
        block(StoneRight, 1260.0, 280.0),
    ];

    let mut first = vec![
        block(GrassLeft, 500.0, 500.0),
        block(GrassMiddle, 570.0, 500.0),
        block(GrassRight, 640.0, 500.0),
    ];
    first.extend_from_slice(&shared);

    let mut second = vec![
        block(StoneLeft, 500.0, 550.0),
        block(StoneMiddle, 570.0, 550.0),
        block(StoneRight, 640.0, 550.0),
    ];
    second.extend_from_slice(&shared);

    vec![
        LevelSpec {
            background: "background_01".into(),
            limit: -2500.0,
            blocks: first,
            movers: vec![MoverSpec {
                tile: StoneMiddle,
                x: 1350.0,
                y: 280.0,
                dx: 1.0,
                dy: 0.0,
                left: 1350.0,
                right: 1600.0,
                top: 0.0,
                bottom: 0.0,
            }],
        },
        LevelSpec {
            background: "background_02".into(),
            limit: -1000.0,
            blocks: second,
            movers: vec![MoverSpec {
                tile: StoneMiddle,
                x: 1500.0,
                y: 300.0,
                dx: 0.0,
                dy: -1.0,
                left: 0.0,
                right: 0.0,
                top: 100.0,
                bottom: 550.0,
            }],
        },
    ]
}

/// Read a JSON array of levels.
pub fn load_levels(path: &Path) -> Result<Vec<LevelSpec>, GameError> {
    let file = File::open(path)?;
    let levels: Vec<LevelSpec> = serde_json::from_reader(BufReader::new(file))?;
    if levels.is_empty() {
        return Err(GameError::Config(format!(
            "level file {} has no levels",
            path.display()
        )));
    }
    info!("loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    pub change: Vec2,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub tile: Tile,
    /// World coordinates.
    pub rect: Rect,
    pub motion: Option<Motion>,
}

impl Block {
    fn new(tile: Tile, x: f32, y: f32) -> Self {
        let source = tile.source();
        Self {
            tile,
            rect: Rect::new(x, y, source.w, source.h),
            motion: None,
        }
    }

    /// Horizontal speed carried over to a player standing on the block.
    pub fn carry_x(&self) -> f32 {
        self.motion.as_ref().map_or(0.0, |m| m.change.x)
    }
}

#[derive(Debug, Clone)]
pub struct Level {
    pub background: String,
    pub limit: f32,
    pub blocks: Vec<Block>,
    /// Horizontal scroll; world x + shift = screen x.
    pub shift: f32,
}

impl Level {
    pub fn from_spec(spec: &LevelSpec) -> Self {
        let mut blocks: Vec<Block> = spec
            .blocks
            .iter()
            .map(|b| Block::new(b.tile, b.x, b.y))
            .collect();
        blocks.extend(spec.movers.iter().map(|m| Block {
            motion: Some(Motion {
                change: Vec2::new(m.dx, m.dy),
                left: m.left,
                right: m.right,
                top: m.top,
                bottom: m.bottom,
            }),
            ..Block::new(m.tile, m.x, m.y)
        }));
        Self {
            background: spec.background.clone(),
            limit: spec.limit,
            blocks,
            shift: 0.0,
        }
    }

    pub fn screen_rect(&self, block: &Block) -> Rect {
        block.rect.translated(Vec2::new(self.shift, 0.0))
    }

    /// Screen rectangles and carry speeds of the blocks overlapping `rect`.
    pub fn collisions(&self, rect: &Rect) -> Vec<(Rect, f32)> {
        self.blocks
            .iter()
            .map(|b| (self.screen_rect(b), b.carry_x()))
            .filter(|(r, _)| r.overlaps(rect))
            .collect()
    }

    pub fn shift_world(&mut self, dx: f32) {
        self.shift += dx;
    }

    /// Move the platforms one physics step, pushing `player` (screen
    /// coordinates) out of their way.
    pub fn update(&mut self, player: &mut Rect) {
        let shift = Vec2::new(self.shift, 0.0);
        for block in &mut self.blocks {
            let Some(motion) = block.motion.as_mut() else {
                continue;
            };

            if motion.change.x != 0.0 {
                block.rect.x += motion.change.x;
                let on_screen = block.rect.translated(shift);
                if on_screen.overlaps(player) {
                    player.x = if motion.change.x < 0.0 {
                        on_screen.left() - player.w
                    } else {
                        on_screen.right()
                    };
                }
                if block.rect.x < motion.left || block.rect.x > motion.right {
                    motion.change.x = -motion.change.x;
                }
            }

            if motion.change.y != 0.0 {
                block.rect.y += motion.change.y;
                let on_screen = block.rect.translated(shift);
                if on_screen.overlaps(player) {
                    player.y = if motion.change.y < 0.0 {
                        on_screen.top() - player.h
                    } else {
                        on_screen.bottom()
                    };
                }
                if block.rect.bottom() > motion.bottom || block.rect.top() < motion.top {
                    motion.change.y = -motion.change.y;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].blocks.len(), 12);
        assert_eq!(levels[1].limit, -1000.0);

        let level = Level::from_spec(&levels[0]);
        assert_eq!(level.blocks.len(), 13);
        assert_eq!(level.blocks[12].carry_x(), 1.0);
        assert_eq!(level.blocks[9].rect, Rect::new(1120.0, 280.0, 70.0, 40.0));
    }

    #[test]
    fn test_json_levels_parse_with_defaults() {
        let json = r#"[{"background":"bg","limit":-300,
            "blocks":[{"tile":"GrassLeft","x":10,"y":20}],
            "movers":[{"tile":"StoneMiddle","x":0,"y":0,"dy":2,"top":0,"bottom":100}]}]"#;
        let levels: Vec<LevelSpec> = serde_json::from_str(json).unwrap();
        assert_eq!(levels[0].movers[0].dx, 0.0);
        assert_eq!(levels[0].movers[0].bottom, 100.0);

        let path = std::env::temp_dir().join(format!("tickengine-levels-{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        assert_eq!(load_levels(&path).unwrap(), levels);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_malformed_level_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("tickengine-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_levels(&path), Err(GameError::Level(_))));
        let _ = std::fs::remove_file(path);
        assert!(matches!(
            load_levels(Path::new("/no/such/levels.json")),
            Err(GameError::Io(_))
        ));
    }

    #[test]
    fn test_collisions_follow_the_scroll() {
        let mut level = Level::from_spec(&builtin_levels()[0]);
        let probe = Rect::new(510.0, 490.0, 10.0, 20.0);
        assert_eq!(level.collisions(&probe).len(), 1);
        level.shift_world(-100.0);
        assert!(level.collisions(&probe).is_empty());
        assert_eq!(level.collisions(&probe.translated(Vec2::new(-100.0, 0.0))).len(), 1);
    }

    #[test]
    fn test_horizontal_mover_bounces_between_bounds() {
        let mut level = Level::from_spec(&builtin_levels()[0]);
        let mut player = Rect::new(0.0, 0.0, 66.0, 90.0);
        for _ in 0..251 {
            level.update(&mut player);
        }
        assert_eq!(level.blocks[12].rect.x, 1601.0);
        assert_eq!(level.blocks[12].carry_x(), -1.0);
    }

    #[test]
    fn test_rising_platform_lifts_the_player() {
        let mut level = Level::from_spec(&builtin_levels()[1]);
        let mover = level.blocks[12].rect;
        let mut player = Rect::new(mover.x, mover.y - 90.0, 66.0, 90.0);
        level.update(&mut player);
        assert_eq!(player.bottom(), level.blocks[12].rect.top());
        assert_eq!(level.blocks[12].rect.y, 299.0);
    }
}
