//! The invader swarm.
//!
//! Seventy invaders move as one block. Every time the frame timer runs out the
//! swarm brain thinks once: marching steps sideways until the block touches a
//! screen edge, descending drops the block one row, reverses it and speeds it
//! up. One invader at a time drops a bullet on its own timer.

use glam::Vec2;
use log::debug;

use crate::components::rect::Rect;
use crate::components::statemachine::{Keyed, State, StateMachine};
use crate::error::StateMachineError;
use crate::games::invaders::bullets::Bullets;

pub const ROWS: usize = 7;
pub const COLUMNS: usize = 10;
pub const INVADER_SIZE: f32 = 32.0;
pub const STEP_X: f32 = 8.0;
pub const STEP_DOWN: f32 = 32.0;
pub const MIN_FRAME_MS: i64 = 200;
pub const MIN_BULLET_DROP_MS: i64 = 1000;
pub const INITIAL_BULLET_DROP_MS: i64 = 2500;
/// The shooter index advances by this much each shot.
pub const SHOOTER_STEP: usize = 3;
pub const BULLET_SPEED: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invader {
    pub pos: Vec2,
    /// Sprite sheet row, alternating per swarm row.
    pub alien_type: u8,
    pub anim_frame: u8,
}

impl Invader {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, INVADER_SIZE, INVADER_SIZE)
    }

    /// `other` lies entirely inside this invader's box.
    pub fn hit(&self, other: &Rect) -> bool {
        self.rect().contains(other)
    }

    fn flip_frame(&mut self) {
        self.anim_frame = 1 - self.anim_frame;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwarmState {
    Marching,
    Descending,
}

impl Keyed for SwarmState {
    type Key = SwarmState;

    fn key(&self) -> SwarmState {
        *self
    }
}

/// Everything the swarm brain moves around.
#[derive(Debug)]
pub struct Formation {
    pub invaders: Vec<Invader>,
    /// Sideways step per frame, sign gives the direction.
    pub speed_x: f32,
    /// Time between two frames of the swarm.
    pub frame_ms: i64,
    pub bullet_drop_ms: i64,
    pub screen_width: f32,
}

impl Formation {
    fn populate(&mut self, offset_y: f32) {
        self.invaders.clear();
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                self.invaders.push(Invader {
                    pos: Vec2::new(160.0 + col as f32 * 48.0 + 8.0, row as f32 * 32.0 + offset_y),
                    alien_type: (row % 2) as u8,
                    anim_frame: 0,
                });
            }
        }
    }

    /// Bounding box of the living invaders.
    pub fn area(&self) -> Option<Rect> {
        let first = self.invaders.first()?.rect();
        Some(self.invaders.iter().skip(1).fold(first, |acc, inv| {
            let r = inv.rect();
            let x = acc.x.min(r.x);
            let y = acc.y.min(r.y);
            Rect::new(x, y, acc.right().max(r.right()) - x, acc.bottom().max(r.bottom()) - y)
        }))
    }
}

impl State<Formation> for SwarmState {
    fn do_actions(&mut self, swarm: &mut Formation, _elapsed_ms: u32) {
        match self {
            SwarmState::Marching => {
                for invader in &mut swarm.invaders {
                    invader.flip_frame();
                    invader.pos.x += swarm.speed_x;
                }
            }
            SwarmState::Descending => {
                for invader in &mut swarm.invaders {
                    invader.flip_frame();
                    invader.pos.y += STEP_DOWN;
                }
                swarm.speed_x = -swarm.speed_x;
                swarm.bullet_drop_ms = (swarm.bullet_drop_ms - 250).max(MIN_BULLET_DROP_MS);
                swarm.frame_ms = (swarm.frame_ms - 100).max(MIN_FRAME_MS);
            }
        }
    }

    fn check_conditions(&mut self, swarm: &mut Formation) -> Option<SwarmState> {
        match self {
            SwarmState::Marching => {
                let area = swarm.area()?;
                let at_edge = (area.x <= 0.0 && swarm.speed_x < 0.0)
                    || (area.right() >= swarm.screen_width && swarm.speed_x > 0.0);
                at_edge.then_some(SwarmState::Descending)
            }
            SwarmState::Descending => Some(SwarmState::Marching),
        }
    }
}

pub struct Swarm {
    pub formation: Formation,
    brain: StateMachine<SwarmState>,
    frame_count: i64,
    pub bullets: Bullets,
    shoot_timer: i64,
    current_shooter: usize,
    floor: f32,
}

impl Swarm {
    pub fn new(
        screen: Vec2,
        offset_y: f32,
        frame_ms: u32,
    ) -> Result<Self, StateMachineError> {
        let mut formation = Formation {
            invaders: Vec::with_capacity(ROWS * COLUMNS),
            speed_x: -STEP_X,
            frame_ms: frame_ms as i64,
            bullet_drop_ms: INITIAL_BULLET_DROP_MS,
            screen_width: screen.x,
        };
        formation.populate(offset_y);

        let mut brain = StateMachine::new()
            .with_state(SwarmState::Marching)?
            .with_state(SwarmState::Descending)?;
        brain.set_state(SwarmState::Marching, &mut formation)?;

        Ok(Self {
            formation,
            brain,
            frame_count: frame_ms as i64,
            bullets: Bullets::new(BULLET_SPEED),
            shoot_timer: INITIAL_BULLET_DROP_MS,
            current_shooter: 0,
            floor: screen.y,
        })
    }

    /// Refill the swarm for the next level.
    pub fn reset(&mut self, offset_y: f32, frame_ms: u32) {
        debug!("swarm reset, frame time {} ms", frame_ms);
        self.formation.frame_ms = frame_ms as i64;
        self.frame_count = frame_ms as i64;
        self.formation.populate(offset_y);
    }

    pub fn mode(&self) -> Option<SwarmState> {
        self.brain.active_key()
    }

    pub fn invaders(&self) -> &[Invader] {
        &self.formation.invaders
    }

    pub fn is_empty(&self) -> bool {
        self.formation.invaders.is_empty()
    }

    /// Remove invaders by index.
    pub fn kill(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for i in sorted.into_iter().rev() {
            if i < self.formation.invaders.len() {
                self.formation.invaders.remove(i);
            }
        }
    }

    /// Lowest edge of the swarm.
    pub fn bottom(&self) -> Option<f32> {
        self.formation.area().map(|a| a.bottom())
    }

    pub fn update(&mut self, elapsed_ms: u32) -> Result<(), StateMachineError> {
        self.bullets.update(elapsed_ms, self.floor);

        self.frame_count -= elapsed_ms as i64;
        if self.frame_count < 0 {
            self.brain.think(&mut self.formation, elapsed_ms)?;
            self.frame_count += self.formation.frame_ms;
        }

        self.shoot_timer -= elapsed_ms as i64;
        if self.shoot_timer <= 0 {
            self.shoot_timer += self.formation.bullet_drop_ms;
            let count = self.formation.invaders.len();
            if count > 0 {
                self.current_shooter = (self.current_shooter + SHOOTER_STEP) % count;
                let shooter = self.formation.invaders[self.current_shooter].pos;
                self.bullets.fire(shooter + Vec2::new(9.0, 16.0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swarm() -> Swarm {
        Swarm::new(Vec2::new(800.0, 600.0), 48.0, 500).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let s = swarm();
        assert_eq!(s.invaders().len(), 70);
        assert_eq!(s.invaders()[0].pos, Vec2::new(168.0, 48.0));
        assert_eq!(s.invaders()[69].pos, Vec2::new(600.0, 240.0));
        assert_eq!(s.invaders()[10].alien_type, 1);
        assert_eq!(s.mode(), Some(SwarmState::Marching));
        assert_eq!(s.bottom(), Some(272.0));
    }

    #[test]
    fn test_marches_left_until_the_edge_then_descends_and_reverses() {
        let mut s = swarm();
        s.update(501).unwrap();
        assert_eq!(s.invaders()[0].pos.x, 160.0);
        assert_eq!(s.invaders()[0].anim_frame, 1);

        for _ in 1..21 {
            s.update(501).unwrap();
        }
        assert_eq!(s.invaders()[0].pos.x, 0.0);
        assert_eq!(s.mode(), Some(SwarmState::Descending));

        s.update(501).unwrap();
        assert_eq!(s.invaders()[0].pos, Vec2::new(0.0, 80.0));
        assert_eq!(s.formation.speed_x, STEP_X);
        assert_eq!(s.formation.frame_ms, 400);
        assert_eq!(s.formation.bullet_drop_ms, 2250);
        assert_eq!(s.mode(), Some(SwarmState::Marching));
    }

    #[test]
    fn test_shooter_steps_by_three() {
        let mut s = swarm();
        s.update(2500).unwrap();
        let shooter = s.invaders()[3].pos;
        assert_eq!(s.bullets.bullets, vec![shooter + Vec2::new(9.0, 16.0)]);
    }

    #[test]
    fn test_kill_and_reset() {
        let mut s = swarm();
        s.kill(&[0, 69, 0]);
        assert_eq!(s.invaders().len(), 68);
        s.kill(&(0..68).collect::<Vec<_>>());
        assert!(s.is_empty());
        assert_eq!(s.bottom(), None);
        // an empty swarm still ticks
        s.update(3000).unwrap();

        s.reset(48.0, 450);
        assert_eq!(s.invaders().len(), 70);
        assert_eq!(s.formation.frame_ms, 450);
    }
}
