//! Bullets shared by the player and the swarm.

use glam::Vec2;

use crate::components::rect::Rect;

pub const BULLET_SIZE: f32 = 8.0;
pub const MAX_BULLETS: usize = 3;
pub const FIRE_COOLDOWN_MS: i64 = 1000;

#[derive(Debug, Clone)]
pub struct Bullets {
    pub bullets: Vec<Vec2>,
    /// Vertical speed in px/s, negative goes up.
    pub speed: f32,
    cooldown: i64,
}

impl Bullets {
    pub fn new(speed: f32) -> Self {
        Self {
            bullets: Vec::new(),
            speed,
            cooldown: 0,
        }
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown == 0 && self.bullets.len() < MAX_BULLETS
    }

    pub fn fire(&mut self, at: Vec2) {
        self.bullets.push(at);
        self.cooldown = FIRE_COOLDOWN_MS;
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    pub fn rect(at: Vec2) -> Rect {
        Rect::new(at.x, at.y, BULLET_SIZE, BULLET_SIZE)
    }

    /// Move every bullet and drop the ones that left `0..=floor`.
    pub fn update(&mut self, elapsed_ms: u32, floor: f32) {
        if self.cooldown > 0 {
            self.cooldown -= elapsed_ms as i64;
        } else {
            self.cooldown = 0;
        }

        let dy = self.speed * elapsed_ms as f32 / 1000.0;
        for bullet in &mut self.bullets {
            bullet.y += dy;
        }
        self.bullets.retain(|b| b.y >= 0.0 && b.y <= floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_fire_until_it_runs_out() {
        let mut b = Bullets::new(-200.0);
        assert!(b.can_fire());
        b.fire(Vec2::new(10.0, 500.0));
        assert!(!b.can_fire());
        b.update(600, 600.0);
        b.update(600, 600.0);
        // cooldown went below zero; it snaps to zero on the next update
        assert!(!b.can_fire());
        b.update(1, 600.0);
        assert!(b.can_fire());
    }

    #[test]
    fn test_at_most_three_in_flight() {
        let mut b = Bullets::new(-1.0);
        for _ in 0..MAX_BULLETS {
            b.fire(Vec2::new(0.0, 500.0));
            b.update(1001, 600.0);
            b.update(1, 600.0);
        }
        assert_eq!(b.bullets.len(), 3);
        assert!(!b.can_fire());
    }

    #[test]
    fn test_bullets_leaving_the_screen_are_removed() {
        let mut b = Bullets::new(200.0);
        b.fire(Vec2::new(0.0, 590.0));
        b.update(100, 600.0);
        assert!(b.bullets.is_empty());
    }
}
