//! Platformer player: physics and stance.
//!
//! Physics runs in fixed steps. The stance brain runs after each step and
//! picks the animation frame.

use log::trace;

use crate::components::rect::Rect;
use crate::components::statemachine::{Keyed, State, StateMachine};
use crate::error::StateMachineError;
use crate::games::platformer::level::Level;

pub const PLAYER_WIDTH: f32 = 66.0;
pub const PLAYER_HEIGHT: f32 = 90.0;
pub const WALK_SPEED: f32 = 6.0;
pub const JUMP_SPEED: f32 = 10.0;
pub const GRAVITY: f32 = 0.35;
/// World pixels per walking frame.
pub const STRIDE: f32 = 30.0;

/// Walking frames in the player sprite sheet, facing right.
pub const WALK_FRAMES: [Rect; 7] = [
    Rect::new(0.0, 0.0, 66.0, 90.0),
    Rect::new(66.0, 0.0, 66.0, 90.0),
    Rect::new(132.0, 0.0, 67.0, 90.0),
    Rect::new(0.0, 93.0, 66.0, 90.0),
    Rect::new(66.0, 93.0, 66.0, 90.0),
    Rect::new(132.0, 93.0, 72.0, 90.0),
    Rect::new(0.0, 186.0, 70.0, 90.0),
];
/// Frame held while in the air.
pub const AIRBORNE_FRAME: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    Standing,
    Walking,
    Airborne,
}

impl Keyed for Stance {
    type Key = Stance;

    fn key(&self) -> Stance {
        *self
    }
}

/// The player's physical state, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub rect: Rect,
    pub change_x: f32,
    pub change_y: f32,
    pub facing_left: bool,
    pub on_ground: bool,
    /// Index into [`WALK_FRAMES`].
    pub frame: usize,
    /// Horizontal world position, drives the walk cycle.
    pub world_x: f32,
}

impl State<Body> for Stance {
    fn entry_actions(&mut self, body: &mut Body) {
        match self {
            Stance::Standing => body.frame = 0,
            Stance::Airborne => body.frame = AIRBORNE_FRAME,
            Stance::Walking => {}
        }
    }

    fn do_actions(&mut self, body: &mut Body, _elapsed_ms: u32) {
        if *self == Stance::Walking {
            let cycle = (body.world_x / STRIDE).floor() as i64;
            body.frame = cycle.rem_euclid(WALK_FRAMES.len() as i64) as usize;
        }
    }

    fn check_conditions(&mut self, body: &mut Body) -> Option<Stance> {
        let next = if !body.on_ground {
            Stance::Airborne
        } else if body.change_x != 0.0 {
            Stance::Walking
        } else {
            Stance::Standing
        };
        (next != *self).then_some(next)
    }
}

pub struct Player {
    pub body: Body,
    brain: StateMachine<Stance>,
    floor: f32,
}

impl Player {
    pub fn new(x: f32, floor: f32) -> Result<Self, StateMachineError> {
        let mut body = Body {
            rect: Rect::new(x, floor - PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_HEIGHT),
            change_x: 0.0,
            change_y: 0.0,
            facing_left: false,
            on_ground: true,
            frame: 0,
            world_x: x,
        };
        let mut brain = StateMachine::new()
            .with_state(Stance::Standing)?
            .with_state(Stance::Walking)?
            .with_state(Stance::Airborne)?;
        brain.set_state(Stance::Standing, &mut body)?;
        Ok(Self { body, brain, floor })
    }

    pub fn stance(&self) -> Option<Stance> {
        self.brain.active_key()
    }

    pub fn go_left(&mut self) {
        self.body.change_x = -WALK_SPEED;
        self.body.facing_left = true;
    }

    pub fn go_right(&mut self) {
        self.body.change_x = WALK_SPEED;
        self.body.facing_left = false;
    }

    pub fn stop(&mut self) {
        self.body.change_x = 0.0;
    }

    fn standing_on_something(&self, level: &Level) -> bool {
        let probe = self.body.rect.translated(glam::Vec2::new(0.0, 2.0));
        !level.collisions(&probe).is_empty() || self.body.rect.bottom() >= self.floor
    }

    /// Jump, if there is something to jump off.
    pub fn jump(&mut self, level: &Level) {
        if self.standing_on_something(level) {
            trace!("jump");
            self.body.change_y -= JUMP_SPEED;
        }
    }

    fn apply_gravity(&mut self) {
        let body = &mut self.body;
        if body.change_y == 0.0 {
            body.change_y = 1.0;
        } else {
            body.change_y += GRAVITY;
        }
        if body.rect.y >= self.floor - body.rect.h && body.change_y >= 0.0 {
            body.change_y = 0.0;
            body.rect.y = self.floor - body.rect.h;
        }
    }

    /// One physics step against `level`.
    pub fn step(&mut self, level: &Level) -> Result<(), StateMachineError> {
        self.apply_gravity();

        let body = &mut self.body;
        body.rect.x += body.change_x;
        for (block, _) in level.collisions(&body.rect) {
            if body.change_x > 0.0 {
                body.rect.x = block.left() - body.rect.w;
            } else if body.change_x < 0.0 {
                body.rect.x = block.right();
            }
        }

        body.rect.y += body.change_y;
        for (block, carry_x) in level.collisions(&body.rect) {
            if body.change_y > 0.0 {
                body.rect.y = block.top() - body.rect.h;
            } else if body.change_y < 0.0 {
                body.rect.y = block.bottom();
            }
            body.change_y = 0.0;
            body.rect.x += carry_x;
        }

        self.settle(level)
    }

    /// Refresh ground contact and let the stance brain think.
    pub fn settle(&mut self, level: &Level) -> Result<(), StateMachineError> {
        self.body.on_ground = self.body.change_y == 0.0 && self.standing_on_something(level);
        self.body.world_x = self.body.rect.x - level.shift;
        self.brain.think(&mut self.body, 0)
    }

    /// Sprite sheet region for the current frame; a negative width mirrors it.
    pub fn source(&self) -> Rect {
        let frame = WALK_FRAMES[self.body.frame.min(WALK_FRAMES.len() - 1)];
        if self.body.facing_left {
            Rect::new(frame.x, frame.y, -frame.w, frame.h)
        } else {
            frame
        }
    }
}
