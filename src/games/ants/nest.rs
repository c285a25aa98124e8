//! The ant colony world.
//!
//! Ants, leaves and spiders are entities in a `bevy_ecs` [`World`]. Each tick
//! the nest spawns new leaves and spiders, lets every ant think against a
//! snapshot of what is on the field, applies the ants' orders, culls spiders
//! that walked off screen and finally runs the movement schedule.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::debug;

use crate::components::mapposition::MapPosition;
use crate::components::rect::Rect;
use crate::components::seek::Seek;
use crate::components::sprite::Sprite;
use crate::error::GameError;
use crate::games::ants::brain::{
    Ant, AntAgent, AntBrain, AntMode, Field, Load, NestOrder, Sightings, SpiderSighting,
    ant_brain, NEST_SIZE,
};
use crate::resources::surface::{Color, Surface};
use crate::systems::movement::seek_movement;
use crate::systems::render::draw_sprites;
use crate::systems::time::update_world_time;

pub const ANT_SIZE: f32 = 24.0;
pub const LEAF_SIZE: f32 = 20.0;
pub const SPIDER_SIZE: f32 = 32.0;
pub const SPIDER_HEALTH: i32 = 25;
/// A leaf appears one tick in this many.
pub const LEAF_ODDS: u32 = 10;
/// A spider appears one tick in this many.
pub const SPIDER_ODDS: u32 = 100;

const NEST_COLOR: Color = Color::rgb(200, 255, 200);

#[derive(Component, Debug, Default)]
pub struct Leaf;

#[derive(Component, Debug)]
pub struct Spider {
    pub health: i32,
}

impl Spider {
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl Load {
    pub fn texture(&self) -> &'static str {
        match self {
            Load::Leaf => "leaf",
            Load::Spider => "spider",
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            Load::Leaf => LEAF_SIZE,
            Load::Spider => SPIDER_SIZE,
        }
    }

    /// Where the load is drawn for a carrier standing at `at`: behind and
    /// vertically centred.
    pub fn rect_for(&self, at: Vec2) -> Rect {
        let size = self.size();
        Rect::new(at.x - size, at.y - size / 2.0, size, size)
    }
}

pub struct Nest {
    world: World,
    schedule: Schedule,
    rng: Rng,
    field: Field,
    /// Loads dropped on the nest floor; they stay forever.
    floor: Vec<(Rect, Load)>,
}

impl Nest {
    pub fn new(size: Vec2, ant_count: usize, rng: Rng) -> Result<Self, GameError> {
        let mut schedule = Schedule::default();
        schedule.add_systems(seek_movement);
        let mut nest = Self {
            world: World::new(),
            schedule,
            rng,
            field: Field {
                size,
                nest: size / 2.0,
            },
            floor: Vec::new(),
        };
        for _ in 0..ant_count {
            let position = nest.field.random_point(&mut nest.rng);
            nest.spawn_ant(position)?;
        }
        Ok(nest)
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Add an ant that starts out exploring.
    pub fn spawn_ant(&mut self, position: Vec2) -> Result<Entity, GameError> {
        let mut seek = Seek::new(position, 0.0);
        let mut ant = Ant::default();
        let mut brain = ant_brain()?;
        let mut sightings = Sightings::default();
        let mut orders = Vec::new();
        brain.set_state(
            AntMode::Exploring,
            &mut AntAgent {
                position,
                seek: &mut seek,
                ant: &mut ant,
                sightings: &mut sightings,
                rng: &mut self.rng,
                field: self.field,
                orders: &mut orders,
            },
        )?;
        Ok(self
            .world
            .spawn((
                MapPosition { pos: position },
                seek,
                ant,
                AntBrain(brain),
                Sprite::new("ant", ANT_SIZE, ANT_SIZE),
            ))
            .id())
    }

    pub fn spawn_leaf(&mut self, position: Vec2) -> Entity {
        self.world
            .spawn((
                MapPosition { pos: position },
                Leaf,
                Sprite::new("leaf", LEAF_SIZE, LEAF_SIZE),
            ))
            .id()
    }

    /// Add a spider walking from `from` to `to`.
    pub fn spawn_spider(&mut self, from: Vec2, to: Vec2) -> Entity {
        let speed = (50 + self.rng.i32(-20..=20)) as f32;
        self.world
            .spawn((
                MapPosition { pos: from },
                Seek::new(to, speed),
                Spider {
                    health: SPIDER_HEALTH,
                },
                Sprite::new("spider", SPIDER_SIZE, SPIDER_SIZE),
            ))
            .id()
    }

    fn spawn_random(&mut self) {
        let (width, height) = (self.field.size.x, self.field.size.y as i32);
        if self.rng.u32(1..=LEAF_ODDS) == 1 {
            let position = self.field.random_point(&mut self.rng);
            self.spawn_leaf(position);
        }
        if self.rng.u32(1..=SPIDER_ODDS) == 1 {
            let from = Vec2::new(-50.0, self.rng.i32(0..=height) as f32);
            let to = Vec2::new(width + 50.0, self.rng.i32(0..=height) as f32);
            self.spawn_spider(from, to);
        }
    }

    fn sightings(&mut self) -> Sightings {
        let mut sightings = Sightings::default();
        let mut leaves = self
            .world
            .query_filtered::<(Entity, &MapPosition), With<Leaf>>();
        for (entity, position) in leaves.iter(&self.world) {
            sightings.leaves.insert(entity, position.pos);
        }
        let mut spiders = self.world.query::<(Entity, &MapPosition, &Spider)>();
        for (entity, position, spider) in spiders.iter(&self.world) {
            sightings.spiders.insert(
                entity,
                SpiderSighting {
                    position: position.pos,
                    health: spider.health,
                    bitten: false,
                },
            );
        }
        sightings
    }

    /// One simulation tick.
    pub fn process(&mut self, elapsed_ms: u32) -> Result<(), GameError> {
        self.spawn_random();

        let mut sightings = self.sightings();
        let mut orders = Vec::new();
        {
            let Self {
                world, rng, field, ..
            } = self;
            let mut ants = world.query::<(&MapPosition, &mut Seek, &mut Ant, &mut AntBrain)>();
            for (position, mut seek, mut ant, mut brain) in ants.iter_mut(world) {
                let mut agent = AntAgent {
                    position: position.pos,
                    seek: &mut *seek,
                    ant: &mut *ant,
                    sightings: &mut sightings,
                    rng: &mut *rng,
                    field: *field,
                    orders: &mut orders,
                };
                brain.0.think(&mut agent, elapsed_ms)?;
            }
        }

        self.apply_bites(&sightings);
        self.apply_orders(orders);
        self.cull_spiders();

        update_world_time(&mut self.world, elapsed_ms);
        self.schedule.run(&mut self.world);
        Ok(())
    }

    fn apply_bites(&mut self, sightings: &Sightings) {
        for (entity, sighting) in sightings.spiders.iter().filter(|(_, s)| s.bitten) {
            if let Some(mut spider) = self.world.get_mut::<Spider>(*entity) {
                spider.health = sighting.health;
                let dead = spider.is_dead();
                if let Some(mut seek) = self.world.get_mut::<Seek>(*entity) {
                    seek.speed = if dead { 0.0 } else { 140.0 };
                }
                if dead && let Some(mut sprite) = self.world.get_mut::<Sprite>(*entity) {
                    sprite.flip_v = true;
                }
            }
        }
    }

    fn apply_orders(&mut self, orders: Vec<NestOrder>) {
        for order in orders {
            match order {
                NestOrder::Remove(entity) => {
                    self.world.despawn(entity);
                }
                NestOrder::Drop { at, load } => {
                    debug!("ant dropped a {:?} at {:?}", load, at);
                    self.floor.push((load.rect_for(at), load));
                }
            }
        }
    }

    fn cull_spiders(&mut self) {
        let limit = self.field.size.x + 2.0;
        let mut spiders = self
            .world
            .query_filtered::<(Entity, &MapPosition), With<Spider>>();
        let gone: Vec<Entity> = spiders
            .iter(&self.world)
            .filter(|(_, p)| p.pos.x > limit)
            .map(|(e, _)| e)
            .collect();
        for entity in gone {
            self.world.despawn(entity);
        }
    }

    pub fn ant_modes(&mut self) -> Vec<AntMode> {
        let mut q = self.world.query::<&AntBrain>();
        q.iter(&self.world)
            .filter_map(|brain| brain.0.active_key())
            .collect()
    }

    pub fn leaf_count(&mut self) -> usize {
        let mut q = self.world.query_filtered::<(), With<Leaf>>();
        q.iter(&self.world).count()
    }

    pub fn spider_count(&mut self) -> usize {
        let mut q = self.world.query_filtered::<(), With<Spider>>();
        q.iter(&self.world).count()
    }

    pub fn floor(&self) -> &[(Rect, Load)] {
        &self.floor
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn render(&mut self, surface: &mut Surface) {
        surface.circle(self.field.nest, NEST_SIZE, NEST_COLOR);
        for (rect, load) in &self.floor {
            surface.blit(load.texture(), *rect);
        }

        draw_sprites::<With<Leaf>>(&mut self.world, surface);
        draw_sprites::<With<Spider>>(&mut self.world, surface);

        let mut spiders = self.world.query::<(&MapPosition, &Spider)>();
        for (position, spider) in spiders.iter(&self.world) {
            let bar = Rect::new(
                position.pos.x - 12.0,
                position.pos.y + SPIDER_SIZE / 2.0,
                SPIDER_HEALTH as f32,
                4.0,
            );
            surface.fill_rect(bar, Color::RED);
            surface.fill_rect(
                Rect::new(bar.x, bar.y, spider.health.max(0) as f32, bar.h),
                Color::GREEN,
            );
        }

        draw_sprites::<With<Ant>>(&mut self.world, surface);
        let mut ants = self.world.query::<(&MapPosition, &Ant)>();
        for (position, ant) in ants.iter(&self.world) {
            if let Some(load) = ant.load {
                surface.blit(load.texture(), load.rect_for(position.pos));
            }
        }
    }
}
