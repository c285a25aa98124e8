//! Hacker behaviour.
//!
//! Hackers wander the room, pick an active terminal, walk to it and hack it
//! until the terminal is compromised or the player intervenes. A hacker that
//! walks into a sandbox is stuck there for a while.

use bevy_ecs::prelude::Component;
use fastrand::Rng;
use glam::Vec2;

use crate::components::rect::Rect;
use crate::components::seek::Seek;
use crate::components::statemachine::{Keyed, State, StateMachine};
use crate::components::timer::Countdown;
use crate::error::StateMachineError;
use crate::resources::audio::AudioQueue;

use super::terminal::TerminalState;

pub const HACKER_SIZE: f32 = 48.0;
pub const HACKER_SPEED: f32 = 90.0;
/// Time spent wandering before looking for a terminal.
pub const WANDER_MS: u32 = 5000;
pub const TRAPPED_MS: u32 = 3000;
pub const SANDBOX_SIZE: f32 = 32.0;
pub const HACKING_SOUND: &str = "hacking";

const ARRIVAL_RANGE: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HackerMode {
    Wandering,
    Searching,
    Hacking,
    Fighting,
    Trapped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HackerState {
    Wandering { elapsed_ms: u32 },
    Searching,
    Hacking,
    /// Frozen while the player plays the pipe game against it.
    Fighting,
    Trapped { timer: Countdown },
}

#[derive(Component, Debug, Default, Clone)]
pub struct Hacker {
    /// Index of the terminal being walked to or hacked.
    pub target: Option<usize>,
}

#[derive(Component, Debug)]
pub struct HackerBrain(pub StateMachine<HackerState>);

/// What a hacker knows about a terminal during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalInfo {
    pub pos: Vec2,
    pub state: TerminalState,
}

/// Terminal changes requested by hackers, applied by the room after the
/// hackers have thought.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerminalOrder {
    pub index: usize,
    pub state: TerminalState,
}

pub struct HackerAgent<'a> {
    pub position: Vec2,
    pub seek: &'a mut Seek,
    pub hacker: &'a mut Hacker,
    pub terminals: &'a [TerminalInfo],
    /// Top-left corners of the sandboxes on the floor. A sandbox that traps
    /// a hacker is used up.
    pub sandboxes: &'a mut Vec<Vec2>,
    pub rng: &'a mut Rng,
    pub audio: &'a mut AudioQueue,
    pub room: Vec2,
    pub orders: &'a mut Vec<TerminalOrder>,
}

impl HackerAgent<'_> {
    fn random_point(&mut self) -> Vec2 {
        let margin = HACKER_SIZE / 2.0;
        Vec2::new(
            self.rng.f32() * (self.room.x - 2.0 * margin) + margin,
            self.rng.f32() * (self.room.y - 2.0 * margin) + margin,
        )
    }

    fn target_state(&self) -> Option<TerminalState> {
        self.hacker
            .target
            .and_then(|i| self.terminals.get(i))
            .map(|t| t.state)
    }

    /// Walked into a sandbox: remove it and report the catch.
    fn caught(&mut self) -> bool {
        let body = Rect::centered(self.position, HACKER_SIZE, HACKER_SIZE);
        let hit = self
            .sandboxes
            .iter()
            .position(|s| body.overlaps(&Rect::new(s.x, s.y, SANDBOX_SIZE, SANDBOX_SIZE)));
        match hit {
            Some(i) => {
                self.sandboxes.swap_remove(i);
                true
            }
            None => false,
        }
    }
}

impl Keyed for HackerState {
    type Key = HackerMode;

    fn key(&self) -> HackerMode {
        match self {
            HackerState::Wandering { .. } => HackerMode::Wandering,
            HackerState::Searching => HackerMode::Searching,
            HackerState::Hacking => HackerMode::Hacking,
            HackerState::Fighting => HackerMode::Fighting,
            HackerState::Trapped { .. } => HackerMode::Trapped,
        }
    }
}

impl<'a> State<HackerAgent<'a>> for HackerState {
    fn entry_actions(&mut self, agent: &mut HackerAgent<'a>) {
        match self {
            HackerState::Wandering { elapsed_ms } => {
                *elapsed_ms = 0;
                agent.hacker.target = None;
                agent.seek.speed = HACKER_SPEED;
                agent.seek.destination = agent.random_point();
            }
            HackerState::Searching => {
                if let Some(t) = agent.hacker.target.and_then(|i| agent.terminals.get(i)) {
                    agent.seek.destination = t.pos;
                    agent.seek.speed = HACKER_SPEED;
                }
            }
            HackerState::Hacking => {
                agent.seek.speed = 0.0;
                if let Some(index) = agent.hacker.target {
                    agent.orders.push(TerminalOrder {
                        index,
                        state: TerminalState::BeingHacked,
                    });
                }
                agent.audio.loop_fx(HACKING_SOUND);
            }
            HackerState::Fighting => {
                agent.seek.speed = 0.0;
                if let Some(index) = agent.hacker.target {
                    agent.orders.push(TerminalOrder {
                        index,
                        state: TerminalState::Fixing,
                    });
                }
            }
            HackerState::Trapped { timer } => {
                agent.seek.speed = 0.0;
                timer.restart(TRAPPED_MS);
            }
        }
    }

    fn exit_actions(&mut self, agent: &mut HackerAgent<'a>) {
        if let HackerState::Hacking = self {
            agent.audio.stop_fx(HACKING_SOUND);
        }
    }

    fn do_actions(&mut self, agent: &mut HackerAgent<'a>, elapsed_ms: u32) {
        match self {
            HackerState::Wandering { elapsed_ms: wandered } => {
                *wandered = wandered.saturating_add(elapsed_ms);
                if agent.seek.arrived(agent.position, ARRIVAL_RANGE) {
                    agent.seek.destination = agent.random_point();
                }
            }
            HackerState::Trapped { timer } => timer.tick(elapsed_ms),
            HackerState::Searching | HackerState::Hacking | HackerState::Fighting => {}
        }
    }

    fn check_conditions(&mut self, agent: &mut HackerAgent<'a>) -> Option<HackerMode> {
        match self {
            HackerState::Wandering { elapsed_ms } => {
                if agent.caught() {
                    return Some(HackerMode::Trapped);
                }
                if *elapsed_ms < WANDER_MS {
                    return None;
                }
                let active: Vec<usize> = agent
                    .terminals
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.state == TerminalState::Active)
                    .map(|(i, _)| i)
                    .collect();
                if active.is_empty() {
                    *elapsed_ms = 0;
                    return None;
                }
                agent.hacker.target = Some(active[agent.rng.usize(..active.len())]);
                Some(HackerMode::Searching)
            }
            HackerState::Searching => {
                if agent.caught() {
                    return Some(HackerMode::Trapped);
                }
                if agent.target_state() != Some(TerminalState::Active) {
                    return Some(HackerMode::Wandering);
                }
                agent
                    .seek
                    .arrived(agent.position, ARRIVAL_RANGE)
                    .then_some(HackerMode::Hacking)
            }
            HackerState::Hacking => match agent.target_state() {
                Some(TerminalState::BeingHacked) => None,
                _ => Some(HackerMode::Wandering),
            },
            HackerState::Fighting => None,
            HackerState::Trapped { timer } => timer.is_done().then_some(HackerMode::Wandering),
        }
    }
}

/// A brain with every hacker state registered and none active.
pub fn hacker_brain() -> Result<StateMachine<HackerState>, StateMachineError> {
    StateMachine::new()
        .with_state(HackerState::Wandering { elapsed_ms: 0 })?
        .with_state(HackerState::Searching)?
        .with_state(HackerState::Hacking)?
        .with_state(HackerState::Fighting)?
        .with_state(HackerState::Trapped {
            timer: Countdown::expired(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audio::AudioCmd;

    const ROOM: Vec2 = Vec2::new(800.0, 600.0);

    struct Fixture {
        position: Vec2,
        seek: Seek,
        hacker: Hacker,
        terminals: Vec<TerminalInfo>,
        sandboxes: Vec<Vec2>,
        rng: Rng,
        audio: AudioQueue,
        orders: Vec<TerminalOrder>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                position: Vec2::new(400.0, 300.0),
                seek: Seek::default(),
                hacker: Hacker::default(),
                terminals: vec![
                    TerminalInfo {
                        pos: Vec2::new(100.0, 100.0),
                        state: TerminalState::Compromised,
                    },
                    TerminalInfo {
                        pos: Vec2::new(700.0, 100.0),
                        state: TerminalState::Active,
                    },
                ],
                sandboxes: Vec::new(),
                rng: Rng::with_seed(3),
                audio: AudioQueue::new(),
                orders: Vec::new(),
            }
        }

        fn agent(&mut self) -> HackerAgent<'_> {
            HackerAgent {
                position: self.position,
                seek: &mut self.seek,
                hacker: &mut self.hacker,
                terminals: &self.terminals,
                sandboxes: &mut self.sandboxes,
                rng: &mut self.rng,
                audio: &mut self.audio,
                room: ROOM,
                orders: &mut self.orders,
            }
        }
    }

    fn wandering(fx: &mut Fixture) -> StateMachine<HackerState> {
        let mut brain = hacker_brain().unwrap();
        brain.set_state(HackerMode::Wandering, &mut fx.agent()).unwrap();
        brain
    }

    #[test]
    fn test_wandering_picks_an_active_terminal_after_a_while() {
        let mut fx = Fixture::new();
        let mut brain = wandering(&mut fx);
        assert_eq!(fx.seek.speed, HACKER_SPEED);

        brain.think(&mut fx.agent(), 4999).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Wandering));
        brain.think(&mut fx.agent(), 1).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Searching));
        assert_eq!(fx.hacker.target, Some(1));
        assert_eq!(fx.seek.destination, Vec2::new(700.0, 100.0));
    }

    #[test]
    fn test_no_active_terminal_keeps_wandering() {
        let mut fx = Fixture::new();
        fx.terminals[1].state = TerminalState::Unhackable;
        let mut brain = wandering(&mut fx);
        brain.think(&mut fx.agent(), 6000).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Wandering));
        assert_eq!(fx.hacker.target, None);
    }

    #[test]
    fn test_arrival_starts_hacking_and_the_noise_loop() {
        let mut fx = Fixture::new();
        let mut brain = wandering(&mut fx);
        brain.think(&mut fx.agent(), 5000).unwrap();

        fx.position = Vec2::new(699.0, 100.0);
        brain.think(&mut fx.agent(), 33).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Hacking));
        assert_eq!(fx.seek.speed, 0.0);
        assert_eq!(
            fx.orders,
            vec![TerminalOrder {
                index: 1,
                state: TerminalState::BeingHacked
            }]
        );
        assert!(fx.audio.pending().contains(&AudioCmd::LoopFx {
            id: HACKING_SOUND.to_string()
        }));
    }

    #[test]
    fn test_compromised_target_sends_hacker_wandering_and_stops_noise() {
        let mut fx = Fixture::new();
        fx.hacker.target = Some(1);
        fx.terminals[1].state = TerminalState::BeingHacked;
        let mut brain = hacker_brain().unwrap();
        brain.set_state(HackerMode::Hacking, &mut fx.agent()).unwrap();
        fx.audio.drain();

        fx.terminals[1].state = TerminalState::Compromised;
        brain.think(&mut fx.agent(), 33).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Wandering));
        assert_eq!(fx.hacker.target, None);
        assert_eq!(
            fx.audio.drain()[0],
            AudioCmd::StopFx {
                id: HACKING_SOUND.to_string()
            }
        );
    }

    #[test]
    fn test_sandbox_traps_then_releases() {
        let mut fx = Fixture::new();
        let mut brain = wandering(&mut fx);
        fx.sandboxes.push(fx.position - Vec2::splat(8.0));

        brain.think(&mut fx.agent(), 33).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Trapped));
        assert!(fx.sandboxes.is_empty());
        assert_eq!(fx.seek.speed, 0.0);

        brain.think(&mut fx.agent(), 2999).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Trapped));
        brain.think(&mut fx.agent(), 1).unwrap();
        assert_eq!(brain.active_key(), Some(HackerMode::Wandering));
    }
}
