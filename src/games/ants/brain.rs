//! Ant behaviour.
//!
//! An ant explores the field at random, walks to leaves it spots and carries
//! them home, and gangs up on spiders that wander close to the nest. Each of
//! these is one [`AntState`]; the ant's brain is a
//! [`StateMachine<AntState>`](crate::components::statemachine::StateMachine)
//! driven with an [`AntAgent`].

use bevy_ecs::prelude::{Component, Entity};
use fastrand::Rng;
use glam::Vec2;
use rustc_hash::FxHashMap;

use crate::components::seek::Seek;
use crate::components::statemachine::{Keyed, State, StateMachine};
use crate::error::StateMachineError;

/// Radius of the nest.
pub const NEST_SIZE: f32 = 100.0;
/// How far an ant spots a leaf or a spider.
pub const SIGHT_RANGE: f32 = 100.0;
/// Distance at which a leaf is picked up.
pub const PICK_UP_RANGE: f32 = 5.0;
/// Distance at which a spider can be bitten.
pub const BITE_RANGE: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AntMode {
    Exploring,
    Seeking,
    Delivering,
    Hunting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AntState {
    Exploring,
    Seeking,
    Delivering,
    Hunting { got_kill: bool },
}

/// Something an ant carries back to the nest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Load {
    Leaf,
    Spider,
}

#[derive(Component, Debug, Default, Clone)]
pub struct Ant {
    pub load: Option<Load>,
    pub leaf: Option<Entity>,
    pub spider: Option<Entity>,
}

#[derive(Component, Debug)]
pub struct AntBrain(pub StateMachine<AntState>);

/// What the ants know about a spider during one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpiderSighting {
    pub position: Vec2,
    pub health: i32,
    pub bitten: bool,
}

/// Leaves and spiders present at the start of the tick. Ants remove what they
/// pick up so later ants in the same tick do not see it any more.
#[derive(Debug, Default)]
pub struct Sightings {
    pub leaves: FxHashMap<Entity, Vec2>,
    pub spiders: FxHashMap<Entity, SpiderSighting>,
}

impl Sightings {
    pub fn nearest_leaf(&self, from: Vec2, range: f32) -> Option<Entity> {
        nearest(self.leaves.iter().map(|(e, p)| (*e, *p)), from, range)
    }

    pub fn nearest_spider(&self, from: Vec2, range: f32) -> Option<Entity> {
        nearest(
            self.spiders.iter().map(|(e, s)| (*e, s.position)),
            from,
            range,
        )
    }
}

fn nearest(candidates: impl Iterator<Item = (Entity, Vec2)>, from: Vec2, range: f32) -> Option<Entity> {
    candidates
        .map(|(e, p)| (e, from.distance(p)))
        .filter(|(_, d)| *d < range)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(e, _)| e)
}

/// Changes to the nest that ants request while thinking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NestOrder {
    Remove(Entity),
    /// Leave `load` on the nest floor with its top-left corner at `at`.
    Drop { at: Vec2, load: Load },
}

/// The playing field.
#[derive(Clone, Copy, Debug)]
pub struct Field {
    pub size: Vec2,
    pub nest: Vec2,
}

impl Field {
    pub fn random_point(&self, rng: &mut Rng) -> Vec2 {
        Vec2::new(
            rng.i32(0..=self.size.x as i32) as f32,
            rng.i32(0..=self.size.y as i32) as f32,
        )
    }
}

/// One ant as seen by its brain.
pub struct AntAgent<'a> {
    pub position: Vec2,
    pub seek: &'a mut Seek,
    pub ant: &'a mut Ant,
    pub sightings: &'a mut Sightings,
    pub rng: &'a mut Rng,
    pub field: Field,
    pub orders: &'a mut Vec<NestOrder>,
}

impl Keyed for AntState {
    type Key = AntMode;

    fn key(&self) -> AntMode {
        match self {
            AntState::Exploring => AntMode::Exploring,
            AntState::Seeking => AntMode::Seeking,
            AntState::Delivering => AntMode::Delivering,
            AntState::Hunting { .. } => AntMode::Hunting,
        }
    }
}

impl<'a> State<AntAgent<'a>> for AntState {
    fn entry_actions(&mut self, agent: &mut AntAgent<'a>) {
        match self {
            AntState::Exploring => {
                agent.seek.speed = (120 + agent.rng.i32(-30..=30)) as f32;
                agent.seek.destination = agent.field.random_point(agent.rng);
            }
            AntState::Seeking => {
                if let Some(position) = agent.ant.leaf.and_then(|id| agent.sightings.leaves.get(&id)) {
                    agent.seek.destination = *position;
                    agent.seek.speed = (160 + agent.rng.i32(-20..=20)) as f32;
                }
            }
            AntState::Delivering => {
                agent.seek.speed = 60.0;
                let offset = Vec2::new(
                    agent.rng.i32(-20..=20) as f32,
                    agent.rng.i32(-20..=20) as f32,
                );
                agent.seek.destination = agent.field.nest + offset;
            }
            AntState::Hunting { .. } => {
                agent.seek.speed = (160 + agent.rng.i32(0..=50)) as f32;
            }
        }
    }

    fn exit_actions(&mut self, _agent: &mut AntAgent<'a>) {
        if let AntState::Hunting { got_kill } = self {
            *got_kill = false;
        }
    }

    fn do_actions(&mut self, agent: &mut AntAgent<'a>, _elapsed_ms: u32) {
        match self {
            AntState::Exploring => {
                if agent.rng.u32(1..=20) == 1 {
                    agent.seek.destination = agent.field.random_point(agent.rng);
                }
            }
            AntState::Hunting { got_kill } => {
                let Some(id) = agent.ant.spider else {
                    return;
                };
                let Some(spider) = agent.sightings.spiders.get_mut(&id) else {
                    return;
                };
                agent.seek.destination = spider.position;
                if agent.position.distance(spider.position) >= BITE_RANGE {
                    return;
                }
                if agent.rng.u32(1..=5) == 1 {
                    spider.health -= 1;
                    spider.bitten = true;
                }
                if spider.health <= 0 {
                    agent.sightings.spiders.remove(&id);
                    agent.ant.load = Some(Load::Spider);
                    agent.orders.push(NestOrder::Remove(id));
                    *got_kill = true;
                }
            }
            AntState::Seeking | AntState::Delivering => {}
        }
    }

    fn check_conditions(&mut self, agent: &mut AntAgent<'a>) -> Option<AntMode> {
        match self {
            AntState::Exploring => {
                if let Some(leaf) = agent.sightings.nearest_leaf(agent.position, SIGHT_RANGE) {
                    agent.ant.leaf = Some(leaf);
                    return Some(AntMode::Seeking);
                }
                let spider = agent.sightings.nearest_spider(agent.field.nest, NEST_SIZE)?;
                let spider_at = agent.sightings.spiders.get(&spider)?.position;
                if agent.position.distance(spider_at) < SIGHT_RANGE {
                    agent.ant.spider = Some(spider);
                    return Some(AntMode::Hunting);
                }
                None
            }
            AntState::Seeking => {
                let Some(id) = agent.ant.leaf else {
                    return Some(AntMode::Exploring);
                };
                let Some(leaf_at) = agent.sightings.leaves.get(&id).copied() else {
                    return Some(AntMode::Exploring);
                };
                if agent.position.distance(leaf_at) < PICK_UP_RANGE {
                    agent.sightings.leaves.remove(&id);
                    agent.ant.load = Some(Load::Leaf);
                    agent.orders.push(NestOrder::Remove(id));
                    return Some(AntMode::Delivering);
                }
                None
            }
            AntState::Delivering => {
                if agent.field.nest.distance(agent.position) < NEST_SIZE
                    && agent.rng.u32(1..=10) == 1
                {
                    if let Some(load) = agent.ant.load.take() {
                        agent.orders.push(NestOrder::Drop {
                            at: agent.position,
                            load,
                        });
                    }
                    return Some(AntMode::Exploring);
                }
                None
            }
            AntState::Hunting { got_kill } => {
                if *got_kill {
                    return Some(AntMode::Delivering);
                }
                let spider = agent
                    .ant
                    .spider
                    .and_then(|id| agent.sightings.spiders.get(&id));
                match spider {
                    None => Some(AntMode::Exploring),
                    Some(s) if s.position.distance(agent.field.nest) > NEST_SIZE * 3.0 => {
                        Some(AntMode::Exploring)
                    }
                    Some(_) => None,
                }
            }
        }
    }
}

/// A brain with every ant state registered and none active.
pub fn ant_brain() -> Result<StateMachine<AntState>, StateMachineError> {
    StateMachine::new()
        .with_state(AntState::Exploring)?
        .with_state(AntState::Seeking)?
        .with_state(AntState::Delivering)?
        .with_state(AntState::Hunting { got_kill: false })
}
