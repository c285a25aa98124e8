//! The server room.
//!
//! Hackers are entities in a `bevy_ecs` [`World`] and walk with the shared
//! movement schedule. Terminals, sandboxes and the player are plain fields of
//! the [`Room`]: hackers only ever see a per-tick snapshot of the terminals
//! and hand back [`TerminalOrder`]s, which the room applies once every hacker
//! has thought.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use glam::Vec2;
use log::{debug, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rect::Rect;
use crate::components::seek::Seek;
use crate::components::sprite::Sprite;
use crate::error::GameError;
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::input::InputState;
use crate::resources::surface::{Color, Surface};
use crate::systems::movement::seek_movement;
use crate::systems::render::draw_sprites;
use crate::systems::time::update_world_time;

use super::hacker::{
    Hacker, HackerAgent, HackerBrain, HackerMode, TerminalInfo, TerminalOrder, hacker_brain,
    HACKER_SIZE, HACKING_SOUND, SANDBOX_SIZE,
};
use super::player::{Player, PLAYER_SIZE};
use super::terminal::{Scoreboard, Terminal, TerminalState, TERMINAL_SIZE};

const EDGE: f32 = 32.0;
const LIFE_ICON: f32 = 32.0;

pub struct Room {
    world: World,
    schedule: Schedule,
    rng: Rng,
    size: Vec2,
    terminals: Vec<Terminal>,
    sandboxes: Vec<Vec2>,
    player: Player,
    board: Scoreboard,
    /// Hackers the player was touching last tick.
    contacts: Vec<Entity>,
    fight: Option<Entity>,
}

impl Room {
    pub fn new(
        size: Vec2,
        terminal_count: usize,
        hacker_count: usize,
        mut rng: Rng,
    ) -> Result<Self, GameError> {
        let mut terminals = Vec::with_capacity(terminal_count);
        for i in 0..terminal_count {
            let pos = Vec2::new(
                rng.f32() * (size.x - 2.0 * EDGE).max(0.0) + EDGE,
                rng.f32() * (size.y - 2.0 * EDGE - TERMINAL_SIZE).max(0.0) + EDGE,
            );
            terminals.push(Terminal::new(format!("Terminal {}", i + 1), pos)?);
        }

        let mut schedule = Schedule::default();
        schedule.add_systems(seek_movement);
        let mut room = Self {
            world: World::new(),
            schedule,
            rng,
            size,
            terminals,
            sandboxes: Vec::new(),
            player: Player::new(Vec2::new(size.x / 2.0, (size.y - PLAYER_SIZE).min(500.0)), size),
            board: Scoreboard {
                score: 0,
                lives: terminal_count as u32,
            },
            contacts: Vec::new(),
            fight: None,
        };
        for _ in 0..hacker_count {
            let position = Vec2::new(
                room.rng.f32() * size.x,
                room.rng.f32() * size.y,
            );
            room.spawn_hacker(position)?;
        }
        info!(
            "room ready: {} terminals, {} hackers",
            terminal_count, hacker_count
        );
        Ok(room)
    }

    /// Add a hacker that starts out wandering.
    pub fn spawn_hacker(&mut self, position: Vec2) -> Result<Entity, GameError> {
        let mut seek = Seek::new(position, 0.0);
        let mut hacker = Hacker::default();
        let mut brain = hacker_brain()?;
        let terminals = self.snapshot();
        let mut orders = Vec::new();
        let mut audio = AudioQueue::new();
        brain.set_state(
            HackerMode::Wandering,
            &mut HackerAgent {
                position,
                seek: &mut seek,
                hacker: &mut hacker,
                terminals: &terminals,
                sandboxes: &mut self.sandboxes,
                rng: &mut self.rng,
                audio: &mut audio,
                room: self.size,
                orders: &mut orders,
            },
        )?;
        Ok(self
            .world
            .spawn((
                MapPosition { pos: position },
                seek,
                hacker,
                HackerBrain(brain),
                BoxCollider::new(HACKER_SIZE, HACKER_SIZE),
                Sprite::new("hacker", HACKER_SIZE, HACKER_SIZE),
            ))
            .id())
    }

    fn snapshot(&self) -> Vec<TerminalInfo> {
        self.terminals
            .iter()
            .map(|t| TerminalInfo {
                pos: t.workstation(),
                state: t.state(),
            })
            .collect()
    }

    /// One tick of play. Returns `true` when the player has just walked into
    /// a hacking hacker and a fight has started.
    pub fn update(
        &mut self,
        elapsed_ms: u32,
        input: &InputState,
        audio: &mut AudioQueue,
    ) -> Result<bool, GameError> {
        self.player
            .update(elapsed_ms, input, &mut self.sandboxes, audio);

        let terminals = self.snapshot();
        let mut orders = Vec::new();
        {
            let Self {
                world,
                rng,
                sandboxes,
                size,
                ..
            } = self;
            let mut hackers =
                world.query::<(&MapPosition, &mut Seek, &mut Hacker, &mut HackerBrain)>();
            for (position, mut seek, mut hacker, mut brain) in hackers.iter_mut(world) {
                let mut agent = HackerAgent {
                    position: position.pos,
                    seek: &mut *seek,
                    hacker: &mut *hacker,
                    terminals: &terminals,
                    sandboxes: &mut *sandboxes,
                    rng: &mut *rng,
                    audio: &mut *audio,
                    room: *size,
                    orders: &mut orders,
                };
                brain.0.think(&mut agent, elapsed_ms)?;
            }
        }
        self.apply_orders(orders, audio)?;

        for terminal in &mut self.terminals {
            terminal.think(elapsed_ms, &mut self.board, audio)?;
        }

        update_world_time(&mut self.world, elapsed_ms);
        self.schedule.run(&mut self.world);

        self.check_contacts(audio)
    }

    fn apply_orders(
        &mut self,
        orders: Vec<TerminalOrder>,
        audio: &mut AudioQueue,
    ) -> Result<(), GameError> {
        for order in orders {
            if let Some(terminal) = self.terminals.get_mut(order.index) {
                terminal.set_state(order.state, &mut self.board, audio)?;
            }
        }
        Ok(())
    }

    /// Start a fight with a hacking hacker the player has just touched.
    /// Staying in contact does not start another one.
    fn check_contacts(&mut self, audio: &mut AudioQueue) -> Result<bool, GameError> {
        let body = self.player.rect();
        let mut touching = Vec::new();
        let mut fresh = None;
        {
            let mut hackers = self
                .world
                .query::<(Entity, &MapPosition, &BoxCollider, &HackerBrain)>();
            for (entity, position, collider, brain) in hackers.iter(&self.world) {
                if !body.overlaps(&collider.rect_at(position.pos)) {
                    continue;
                }
                touching.push(entity);
                if fresh.is_none()
                    && !self.contacts.contains(&entity)
                    && brain.0.active_key() == Some(HackerMode::Hacking)
                {
                    fresh = Some(entity);
                }
            }
        }
        self.contacts = touching;

        match fresh {
            Some(entity) => {
                self.start_fight_with(entity, audio)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Freeze `entity` and the terminal it is hacking for a pipe game.
    pub fn start_fight_with(
        &mut self,
        entity: Entity,
        audio: &mut AudioQueue,
    ) -> Result<(), GameError> {
        self.set_hacker(entity, HackerMode::Fighting, audio)?;
        self.fight = Some(entity);
        info!("fight started with hacker {:?}", entity);
        Ok(())
    }

    fn set_hacker(
        &mut self,
        entity: Entity,
        mode: HackerMode,
        audio: &mut AudioQueue,
    ) -> Result<(), GameError> {
        let terminals = self.snapshot();
        let mut orders = Vec::new();
        {
            let Self {
                world,
                rng,
                sandboxes,
                size,
                ..
            } = self;
            let mut hackers =
                world.query::<(&MapPosition, &mut Seek, &mut Hacker, &mut HackerBrain)>();
            let Ok((position, mut seek, mut hacker, mut brain)) = hackers.get_mut(world, entity)
            else {
                return Ok(());
            };
            let mut agent = HackerAgent {
                position: position.pos,
                seek: &mut *seek,
                hacker: &mut *hacker,
                terminals: &terminals,
                sandboxes: &mut *sandboxes,
                rng: &mut *rng,
                audio: &mut *audio,
                room: *size,
                orders: &mut orders,
            };
            brain.0.set_state(mode, &mut agent)?;
        }
        self.apply_orders(orders, audio)
    }

    fn fought_terminal(&self, entity: Entity) -> Option<usize> {
        self.world.get::<Hacker>(entity).and_then(|h| h.target)
    }

    /// The pipe game was won: the terminal is safe for a while and the
    /// hacker goes back to wandering.
    pub fn win_fight(&mut self, audio: &mut AudioQueue) -> Result<(), GameError> {
        let Some(entity) = self.fight.take() else {
            return Ok(());
        };
        if let Some(index) = self.fought_terminal(entity) {
            self.apply_orders(
                vec![TerminalOrder {
                    index,
                    state: TerminalState::Unhackable,
                }],
                audio,
            )?;
        }
        debug!("fight won against hacker {:?}", entity);
        self.set_hacker(entity, HackerMode::Wandering, audio)
    }

    /// The pipe game was left unfinished: the hacker resumes hacking and the
    /// terminal's countdown starts over.
    pub fn abandon_fight(&mut self, audio: &mut AudioQueue) -> Result<(), GameError> {
        let Some(entity) = self.fight.take() else {
            return Ok(());
        };
        debug!("fight abandoned against hacker {:?}", entity);
        self.set_hacker(entity, HackerMode::Hacking, audio)
    }

    /// Stop every looping sound the room started.
    pub fn silence(&mut self, audio: &mut AudioQueue) {
        if self.hacker_modes().contains(&HackerMode::Hacking) {
            audio.stop_fx(HACKING_SOUND);
        }
    }

    /// Restart the loops `silence` stopped.
    pub fn resume_sounds(&mut self, audio: &mut AudioQueue) {
        if self.hacker_modes().contains(&HackerMode::Hacking) {
            audio.loop_fx(HACKING_SOUND);
        }
    }

    pub fn board(&self) -> Scoreboard {
        self.board
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn sandboxes(&self) -> &[Vec2] {
        &self.sandboxes
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn in_fight(&self) -> bool {
        self.fight.is_some()
    }

    pub fn hacker_modes(&mut self) -> Vec<HackerMode> {
        let mut q = self.world.query::<&HackerBrain>();
        q.iter(&self.world)
            .filter_map(|brain| brain.0.active_key())
            .collect()
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn render(&mut self, surface: &mut Surface, font: &BitmapFont, time_left_ms: u32) {
        surface.blit("floor", surface.bounds());

        for sandbox in &self.sandboxes {
            surface.blit(
                "sandbox",
                Rect::new(sandbox.x, sandbox.y, SANDBOX_SIZE, SANDBOX_SIZE),
            );
        }

        for terminal in &self.terminals {
            let rect = terminal.rect();
            surface.blit("terminal", rect);
            surface.outline_rect(rect, 2.0, state_color(terminal.state()));
            if terminal.state() == TerminalState::BeingHacked {
                let seconds = (terminal.timer.remaining.max(0) + 999) / 1000;
                font.draw(
                    surface,
                    &seconds.to_string(),
                    rect.x,
                    rect.y - font.cell as f32,
                );
            }
        }

        draw_sprites::<With<Hacker>>(&mut self.world, surface);
        surface.blit("player", self.player.rect());

        for i in 0..self.board.lives {
            surface.blit(
                "life",
                Rect::new(8.0 + i as f32 * (LIFE_ICON + 8.0), 8.0, LIFE_ICON, LIFE_ICON),
            );
        }
        font.draw(
            surface,
            &format!("SCORE: {}", self.board.score),
            self.size.x / 2.0 - 80.0,
            12.0,
        );
        font.draw(
            surface,
            &format!("TIME: {}", time_left_ms / 1000),
            self.size.x - 140.0,
            12.0,
        );
    }
}

fn state_color(state: TerminalState) -> Color {
    match state {
        TerminalState::Active => Color::GREEN,
        TerminalState::BeingHacked => Color::RED,
        TerminalState::Fixing => Color::YELLOW,
        TerminalState::Unhackable => Color::BLUE,
        TerminalState::Compromised => Color::DARK_GRAY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(800.0, 600.0);

    fn room(terminals: usize, hackers: usize) -> Room {
        Room::new(SIZE, terminals, hackers, Rng::with_seed(11)).unwrap()
    }

    /// Put the first hacker at the first terminal's workstation, hacking it.
    fn hacking_room() -> (Room, Entity) {
        let mut room = room(1, 0);
        let at = room.terminals()[0].workstation();
        let hacker = room.spawn_hacker(at).unwrap();
        room.world_mut().get_mut::<Hacker>(hacker).unwrap().target = Some(0);
        let mut audio = AudioQueue::new();
        room.set_hacker(hacker, HackerMode::Hacking, &mut audio).unwrap();
        (room, hacker)
    }

    #[test]
    fn test_new_room_has_one_life_per_terminal() {
        let mut room = room(3, 2);
        assert_eq!(room.board(), Scoreboard { score: 0, lives: 3 });
        assert_eq!(room.terminals().len(), 3);
        for t in room.terminals() {
            assert!(t.pos.x >= EDGE && t.pos.x <= SIZE.x - EDGE);
            assert_eq!(t.state(), TerminalState::Active);
        }
        assert_eq!(room.hacker_modes(), vec![HackerMode::Wandering; 2]);
    }

    #[test]
    fn test_unattended_hack_costs_a_life() {
        let (mut room, _) = hacking_room();
        assert_eq!(room.terminals()[0].state(), TerminalState::BeingHacked);
        room.player_mut().pos = Vec2::new(PLAYER_SIZE / 2.0, PLAYER_SIZE / 2.0);

        let input = InputState::default();
        let mut audio = AudioQueue::new();
        for _ in 0..11 {
            room.update(1000, &input, &mut audio).unwrap();
        }
        assert_eq!(room.terminals()[0].state(), TerminalState::Compromised);
        assert_eq!(room.board(), Scoreboard { score: -10, lives: 0 });
        assert_eq!(room.hacker_modes(), vec![HackerMode::Wandering]);
    }

    #[test]
    fn test_touching_a_hacking_hacker_starts_one_fight() {
        let (mut room, hacker) = hacking_room();
        let at = room.world_mut().get::<MapPosition>(hacker).unwrap().pos;
        room.player_mut().pos = at;

        let input = InputState::default();
        let mut audio = AudioQueue::new();
        assert!(room.update(16, &input, &mut audio).unwrap());
        assert!(room.in_fight());
        assert_eq!(room.hacker_modes(), vec![HackerMode::Fighting]);
        assert_eq!(room.terminals()[0].state(), TerminalState::Fixing);
    }

    #[test]
    fn test_won_fight_frees_the_terminal() {
        let (mut room, hacker) = hacking_room();
        let at = room.world_mut().get::<MapPosition>(hacker).unwrap().pos;
        room.player_mut().pos = at;
        let input = InputState::default();
        let mut audio = AudioQueue::new();
        room.update(16, &input, &mut audio).unwrap();

        room.win_fight(&mut audio).unwrap();
        assert!(!room.in_fight());
        assert_eq!(room.terminals()[0].state(), TerminalState::Unhackable);
        assert_eq!(room.board().score, 10);
        assert_eq!(room.hacker_modes(), vec![HackerMode::Wandering]);
    }

    #[test]
    fn test_abandoned_fight_resumes_hacking_without_a_new_fight() {
        let (mut room, hacker) = hacking_room();
        let at = room.world_mut().get::<MapPosition>(hacker).unwrap().pos;
        room.player_mut().pos = at;
        let input = InputState::default();
        let mut audio = AudioQueue::new();
        room.update(16, &input, &mut audio).unwrap();

        room.abandon_fight(&mut audio).unwrap();
        assert_eq!(room.hacker_modes(), vec![HackerMode::Hacking]);
        assert_eq!(room.terminals()[0].state(), TerminalState::BeingHacked);
        // still standing on the hacker
        assert!(!room.update(16, &input, &mut audio).unwrap());
    }
}
