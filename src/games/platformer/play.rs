//! Platformer play screen: fixed-step physics, scrolling and level changes.

use glam::Vec2;
use log::info;

use crate::components::rect::Rect;
use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::games::platformer::PlatformerScreen;
use crate::games::platformer::level::{Level, LevelSpec};
use crate::games::platformer::player::Player;
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::input::InputState;
use crate::resources::surface::{Color, Surface};

/// Length of one physics step.
pub const STEP_MS: f32 = 1000.0 / 60.0;
pub const SCROLL_RIGHT: f32 = 500.0;
pub const SCROLL_LEFT: f32 = 120.0;
pub const START_X: f32 = 340.0;
pub const SKY: Color = Color::rgb(0, 0, 255);

pub struct PlayScreen {
    levels: Vec<LevelSpec>,
    index: usize,
    level: Level,
    player: Player,
    accumulator_ms: f32,
    screen: Vec2,
    font: BitmapFont,
    restart: bool,
}

impl PlayScreen {
    pub fn new(levels: Vec<LevelSpec>, screen: Vec2, font: BitmapFont) -> Result<Self, GameError> {
        let Some(first) = levels.first() else {
            return Err(GameError::Config("no platformer levels".into()));
        };
        Ok(Self {
            level: Level::from_spec(first),
            levels,
            index: 0,
            player: Player::new(START_X, screen.y)?,
            accumulator_ms: 0.0,
            screen,
            font,
            restart: false,
        })
    }

    fn reset(&mut self) -> Result<(), GameError> {
        info!("platformer: new game");
        self.index = 0;
        self.level = Level::from_spec(&self.levels[0]);
        self.player = Player::new(START_X, self.screen.y)?;
        self.accumulator_ms = 0.0;
        self.restart = false;
        Ok(())
    }

    pub fn level_index(&self) -> usize {
        self.index
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    fn steer(&mut self, input: &InputState) {
        if input.left() {
            self.player.go_left();
        } else if input.right() {
            self.player.go_right();
        } else {
            self.player.stop();
        }
        if input.up_pressed() {
            self.player.jump(&self.level);
        }
    }

    fn scroll(&mut self) {
        let rect = &mut self.player.body.rect;
        if rect.right() >= SCROLL_RIGHT {
            let diff = rect.right() - SCROLL_RIGHT;
            rect.x = SCROLL_RIGHT - rect.w;
            self.level.shift_world(-diff);
        }
        if rect.left() <= SCROLL_LEFT {
            let diff = SCROLL_LEFT - rect.left();
            rect.x = SCROLL_LEFT;
            self.level.shift_world(diff);
        }
    }

    /// Past the level limit: load the next level. Returns true once the
    /// last level is done.
    fn check_limit(&mut self) -> bool {
        let position = self.player.body.rect.x + self.level.shift;
        if position >= self.level.limit {
            return false;
        }
        self.player.body.rect.x = SCROLL_LEFT;
        if self.index + 1 < self.levels.len() {
            self.index += 1;
            info!("platformer: level {}", self.index + 1);
            self.level = Level::from_spec(&self.levels[self.index]);
            false
        } else {
            true
        }
    }
}

impl GameState<PlatformerScreen> for PlayScreen {
    fn on_enter(&mut self, previous: Option<PlatformerScreen>, _audio: &mut AudioQueue) {
        if previous == Some(PlatformerScreen::MainMenu) {
            self.restart = true;
        }
    }

    fn update(
        &mut self,
        tick: &mut Tick<'_>,
    ) -> Result<Option<Transition<PlatformerScreen>>, GameError> {
        if self.restart {
            self.reset()?;
        }
        if tick.input.action_back.just_pressed {
            return Ok(Some(Transition::Change(PlatformerScreen::MainMenu)));
        }

        self.steer(tick.input);
        self.accumulator_ms += tick.elapsed_ms as f32;
        while self.accumulator_ms >= STEP_MS {
            self.accumulator_ms -= STEP_MS;
            self.player.step(&self.level)?;
            self.level.update(&mut self.player.body.rect);
            self.scroll();
            if self.check_limit() {
                self.restart = true;
                return Ok(Some(Transition::Change(PlatformerScreen::Complete)));
            }
        }
        Ok(None)
    }

    fn draw(&mut self, surface: &mut Surface) {
        surface.fill_rect(surface.bounds(), SKY);
        surface.blit(
            &self.level.background,
            Rect::new(self.level.shift / 3.0, 0.0, self.screen.x * 3.0, self.screen.y),
        );
        for block in &self.level.blocks {
            surface.blit_region("tiles", block.tile.source(), self.level.screen_rect(block));
        }
        surface.blit_region("player", self.player.source(), self.player.body.rect);
        self.font
            .draw(surface, &format!("LEVEL {}", self.index + 1), 8.0, 8.0);
    }
}
