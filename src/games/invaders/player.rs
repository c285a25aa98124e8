use glam::Vec2;

use crate::components::rect::Rect;
use crate::games::invaders::bullets::Bullets;
use crate::resources::audio::AudioQueue;
use crate::resources::input::InputState;

pub const SHIP_SIZE: f32 = 32.0;
pub const START_LIVES: u32 = 3;
pub const SHIP_SPEED: f32 = 100.0;
pub const PLAYER_BULLET_SPEED: f32 = -200.0;
pub const SHOOT_SOUND: &str = "playershoot";

/// The player's ship, its score and its bullets.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u32,
    pub score: u32,
    pub speed: f32,
    /// Set after being hit; the ship ignores input until play resumes.
    pub paused: bool,
    pub bullets: Bullets,
    screen: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, lives: u32, screen: Vec2) -> Self {
        Self {
            pos,
            lives,
            score: 0,
            speed: SHIP_SPEED,
            paused: false,
            bullets: Bullets::new(PLAYER_BULLET_SPEED),
            screen,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, SHIP_SIZE, SHIP_SIZE)
    }

    /// `other` lies entirely inside the ship.
    pub fn hit(&self, other: &Rect) -> bool {
        self.rect().contains(other)
    }

    pub fn update(&mut self, elapsed_ms: u32, input: &InputState, audio: &mut AudioQueue) {
        self.bullets.update(elapsed_ms, self.screen.y);
        if self.paused {
            return;
        }

        let step = elapsed_ms as f32 / 1000.0 * self.speed;
        if input.right() && self.pos.x < self.screen.x - SHIP_SIZE {
            self.pos.x += step;
        } else if input.left() && self.pos.x > 0.0 {
            self.pos.x -= step;
        }

        if input.action_1.active && self.bullets.can_fire() {
            self.bullets.fire(self.pos + Vec2::new(9.0, -16.0));
            audio.play_fx(SHOOT_SOUND);
        }
    }
}
