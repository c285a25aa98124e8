use glam::Vec2;

use crate::components::rect::Rect;
use crate::components::timer::Countdown;
use crate::resources::audio::AudioQueue;
use crate::resources::input::InputState;

use super::hacker::SANDBOX_SIZE;

pub const PLAYER_SIZE: f32 = 64.0;
pub const PLAYER_SPEED: f32 = 150.0;
pub const MAX_SANDBOXES: usize = 3;
pub const SANDBOX_COOLDOWN_MS: u32 = 1000;
pub const SANDBOX_SOUND: &str = "sandbox";

/// The player walking the room. `pos` is the centre of the sprite.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    cooldown: Countdown,
    room: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, room: Vec2) -> Self {
        Self {
            pos,
            cooldown: Countdown::expired(),
            room,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE, PLAYER_SIZE)
    }

    /// Walk with the direction keys and drop a sandbox with space.
    pub fn update(
        &mut self,
        elapsed_ms: u32,
        input: &InputState,
        sandboxes: &mut Vec<Vec2>,
        audio: &mut AudioQueue,
    ) {
        self.cooldown.tick(elapsed_ms);

        let mut direction = Vec2::ZERO;
        if input.left() {
            direction.x -= 1.0;
        }
        if input.right() {
            direction.x += 1.0;
        }
        if input.up() {
            direction.y -= 1.0;
        }
        if input.down() {
            direction.y += 1.0;
        }
        let step = elapsed_ms as f32 / 1000.0 * PLAYER_SPEED;
        let half = PLAYER_SIZE / 2.0;
        self.pos = (self.pos + direction * step).clamp(
            Vec2::splat(half),
            (self.room - Vec2::splat(half)).max(Vec2::splat(half)),
        );

        if input.action_1.active && self.cooldown.is_done() && sandboxes.len() < MAX_SANDBOXES {
            sandboxes.push(self.pos - Vec2::splat(SANDBOX_SIZE / 2.0));
            self.cooldown.restart(SANDBOX_COOLDOWN_MS);
            audio.play_fx(SANDBOX_SOUND);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::Key;

    const ROOM: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_walks_in_four_directions_within_the_room() {
        let mut player = Player::new(Vec2::new(400.0, 300.0), ROOM);
        let mut input = InputState::default();
        let mut audio = AudioQueue::new();
        let mut sandboxes = Vec::new();

        input.set_key(Key::D, true);
        input.set_key(Key::S, true);
        player.update(1000, &input, &mut sandboxes, &mut audio);
        assert_eq!(player.pos, Vec2::new(550.0, 450.0));

        input.set_key(Key::D, false);
        input.set_key(Key::S, false);
        input.set_key(Key::Up, true);
        player.update(10_000, &input, &mut sandboxes, &mut audio);
        assert_eq!(player.pos, Vec2::new(550.0, PLAYER_SIZE / 2.0));
    }

    #[test]
    fn test_sandboxes_are_capped_and_cooled_down() {
        let mut player = Player::new(Vec2::new(400.0, 300.0), ROOM);
        let mut input = InputState::default();
        let mut audio = AudioQueue::new();
        let mut sandboxes = Vec::new();
        input.set_key(Key::Space, true);

        player.update(16, &input, &mut sandboxes, &mut audio);
        assert_eq!(sandboxes, vec![Vec2::new(384.0, 284.0)]);
        player.update(500, &input, &mut sandboxes, &mut audio);
        assert_eq!(sandboxes.len(), 1);
        player.update(500, &input, &mut sandboxes, &mut audio);
        assert_eq!(sandboxes.len(), 2);
        for _ in 0..5 {
            player.update(1000, &input, &mut sandboxes, &mut audio);
        }
        assert_eq!(sandboxes.len(), MAX_SANDBOXES);
        assert_eq!(audio.drain().len(), MAX_SANDBOXES);
    }
}
