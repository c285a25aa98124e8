//! The invaders play field.

use glam::Vec2;
use log::info;
use smallvec::SmallVec;

use crate::components::rect::Rect;
use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::games::invaders::InvadersScreen;
use crate::games::invaders::bullets::{BULLET_SIZE, Bullets};
use crate::games::invaders::explosion::{EXPLOSION_SIZE, Explosions};
use crate::games::invaders::player::{Player, SHIP_SIZE};
use crate::games::invaders::swarm::{INVADER_SIZE, Swarm};
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::surface::Surface;

pub const SWARM_OFFSET_Y: f32 = 48.0;
pub const PLAYER_START: Vec2 = Vec2::new(0.0, 540.0);
pub const KILL_SCORE: u32 = 10;
pub const MIN_SWARM_SPEED_MS: u32 = 100;
pub const ALIEN_DIE_SOUND: &str = "aliendie";
pub const PLAYER_DIE_SOUND: &str = "playerdie";

pub struct PlayScreen {
    screen: Vec2,
    lives: u32,
    initial_speed_ms: u32,
    swarm_speed_ms: u32,
    swarm: Swarm,
    player: Player,
    explosions: Explosions<InvadersScreen>,
    font: BitmapFont,
    /// The last game ended; start over on the next update.
    finished: bool,
}

impl PlayScreen {
    pub fn new(
        screen: Vec2,
        lives: u32,
        swarm_speed_ms: u32,
        font: BitmapFont,
    ) -> Result<Self, GameError> {
        Ok(Self {
            screen,
            lives,
            initial_speed_ms: swarm_speed_ms,
            swarm_speed_ms,
            swarm: Swarm::new(screen, SWARM_OFFSET_Y, swarm_speed_ms)?,
            player: Player::new(PLAYER_START, lives, screen),
            explosions: Explosions::default(),
            font,
            finished: false,
        })
    }

    fn initialise(&mut self) -> Result<(), GameError> {
        info!("invaders: new game");
        self.swarm_speed_ms = self.initial_speed_ms;
        self.swarm = Swarm::new(self.screen, SWARM_OFFSET_Y, self.swarm_speed_ms)?;
        self.player = Player::new(PLAYER_START, self.lives, self.screen);
        self.explosions = Explosions::default();
        self.finished = false;
        Ok(())
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }

    pub fn swarm_speed_ms(&self) -> u32 {
        self.swarm_speed_ms
    }

    pub fn explosions(&self) -> &Explosions<InvadersScreen> {
        &self.explosions
    }

    fn shoot_invaders(&mut self, audio: &mut AudioQueue) {
        let mut dead: SmallVec<[usize; 8]> = SmallVec::new();
        let mut spent: SmallVec<[usize; 4]> = SmallVec::new();
        for (b, bullet) in self.player.bullets.bullets.iter().enumerate() {
            let rect = Bullets::rect(*bullet);
            let target = self
                .swarm
                .invaders()
                .iter()
                .enumerate()
                .find(|(i, inv)| !dead.contains(i) && inv.hit(&rect));
            if let Some((i, _)) = target {
                dead.push(i);
                spent.push(b);
            }
        }
        if dead.is_empty() {
            return;
        }

        for &i in &dead {
            let at = self.swarm.invaders()[i].pos;
            self.explosions.add(at, None);
            self.player.score += KILL_SCORE;
            audio.play_fx(ALIEN_DIE_SOUND);
        }
        for &b in spent.iter().rev() {
            self.player.bullets.bullets.remove(b);
        }
        self.swarm.kill(&dead);
    }

    fn shoot_player(&mut self, audio: &mut AudioQueue) {
        if self.player.paused {
            return;
        }
        let hit = self
            .swarm
            .bullets
            .bullets
            .iter()
            .any(|b| self.player.hit(&Bullets::rect(*b)));
        if !hit {
            return;
        }
        info!("invaders: player hit, {} lives left", self.player.lives.saturating_sub(1));
        self.player.lives = self.player.lives.saturating_sub(1);
        self.player.paused = true;
        self.player.bullets.clear();
        self.swarm.bullets.clear();
        self.explosions
            .add(self.player.pos, Some(InvadersScreen::GetReady));
        audio.play_fx(PLAYER_DIE_SOUND);
    }

    fn swarm_landed(&self) -> bool {
        self.swarm
            .bottom()
            .is_some_and(|bottom| bottom >= self.player.pos.y)
    }
}

impl GameState<InvadersScreen> for PlayScreen {
    fn on_enter(&mut self, _previous: Option<InvadersScreen>, _audio: &mut AudioQueue) {
        self.player.paused = false;
    }

    fn update(
        &mut self,
        tick: &mut Tick<'_>,
    ) -> Result<Option<Transition<InvadersScreen>>, GameError> {
        if self.finished {
            self.initialise()?;
        }

        self.swarm.update(tick.elapsed_ms)?;
        self.player.update(tick.elapsed_ms, tick.input, tick.audio);
        self.shoot_invaders(tick.audio);
        self.shoot_player(tick.audio);
        if self.swarm_landed() {
            info!("invaders: the swarm landed");
            self.player.lives = 0;
        }
        let follow_up = self.explosions.update(tick.elapsed_ms);

        if self.player.lives == 0 {
            self.finished = true;
            return Ok(Some(Transition::Change(InvadersScreen::GameOver)));
        }
        if self.swarm.is_empty() {
            self.swarm_speed_ms = self
                .swarm_speed_ms
                .saturating_sub(50)
                .max(MIN_SWARM_SPEED_MS);
            self.swarm.reset(SWARM_OFFSET_Y, self.swarm_speed_ms);
            return Ok(Some(Transition::Change(InvadersScreen::LevelUp)));
        }
        Ok(follow_up.map(Transition::Change))
    }

    fn draw(&mut self, surface: &mut Surface) {
        for bullet in &self.swarm.bullets.bullets {
            surface.blit("alienbullet", Bullets::rect(*bullet));
        }
        for invader in self.swarm.invaders() {
            let source = Rect::new(
                invader.anim_frame as f32 * INVADER_SIZE,
                invader.alien_type as f32 * INVADER_SIZE,
                INVADER_SIZE,
                INVADER_SIZE,
            );
            surface.blit_region("invaders", source, invader.rect());
        }
        for bullet in &self.player.bullets.bullets {
            surface.blit("bullet", Rect::new(bullet.x, bullet.y, BULLET_SIZE, BULLET_SIZE));
        }
        surface.blit("ship", self.player.rect());

        for i in 0..self.player.lives {
            surface.blit("ship", Rect::new(8.0 + i as f32 * 40.0, 8.0, SHIP_SIZE, SHIP_SIZE));
        }
        self.font.draw(
            surface,
            &format!("1UP SCORE: {}", self.player.score),
            160.0,
            12.0,
        );

        for explosion in &self.explosions.list {
            let source = Rect::new(
                explosion.frame as f32 * EXPLOSION_SIZE,
                0.0,
                EXPLOSION_SIZE,
                EXPLOSION_SIZE,
            );
            let dest = Rect::new(explosion.pos.x, explosion.pos.y, EXPLOSION_SIZE, EXPLOSION_SIZE);
            surface.blit_region("explosion", source, dest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audio::AudioCmd;
    use crate::games::font;
    use crate::resources::input::InputState;

    fn play() -> PlayScreen {
        PlayScreen::new(Vec2::new(800.0, 600.0), 3, 500, font()).unwrap()
    }

    fn step(screen: &mut PlayScreen, elapsed_ms: u32, audio: &mut AudioQueue) -> Option<Transition<InvadersScreen>> {
        let input = InputState::default();
        let mut tick = Tick {
            elapsed_ms,
            pointer: None,
            input: &input,
            audio,
        };
        screen.update(&mut tick).unwrap()
    }

    #[test]
    fn test_bullet_inside_invader_kills_it() {
        let mut p = play();
        let target = p.swarm().invaders()[0].pos;
        p.player_mut().bullets.bullets.push(target + Vec2::new(12.0, 12.0));

        let mut audio = AudioQueue::new();
        assert!(step(&mut p, 0, &mut audio).is_none());
        assert_eq!(p.swarm().invaders().len(), 69);
        assert_eq!(p.player().score, 10);
        assert!(p.player().bullets.bullets.is_empty());
        assert_eq!(p.explosions().list.len(), 1);
        assert!(audio.pending().contains(&AudioCmd::PlayFx {
            id: ALIEN_DIE_SOUND.to_string()
        }));
    }

    #[test]
    fn test_player_hit_pauses_and_leads_to_get_ready() {
        let mut p = play();
        let at = p.player().pos + Vec2::new(4.0, 4.0);
        p.swarm_mut().bullets.bullets.push(at);

        let mut audio = AudioQueue::new();
        assert!(step(&mut p, 0, &mut audio).is_none());
        assert_eq!(p.player().lives, 2);
        assert!(p.player().paused);
        assert!(p.swarm().bullets.bullets.is_empty());

        let mut next = None;
        for _ in 0..20 {
            next = step(&mut p, 60, &mut audio);
            if next.is_some() {
                break;
            }
        }
        assert!(matches!(next, Some(Transition::Change(InvadersScreen::GetReady))));

        p.on_enter(Some(InvadersScreen::GetReady), &mut audio);
        assert!(!p.player().paused);
    }

    #[test]
    fn test_clearing_the_swarm_levels_up_faster() {
        let mut p = play();
        let all: Vec<usize> = (0..70).collect();
        p.swarm_mut().kill(&all);
        let next = step(&mut p, 0, &mut AudioQueue::new());
        assert!(matches!(next, Some(Transition::Change(InvadersScreen::LevelUp))));
        assert_eq!(p.swarm_speed_ms(), 450);
        assert_eq!(p.swarm().invaders().len(), 70);
    }

    #[test]
    fn test_last_life_ends_the_game_and_next_entry_starts_over() {
        let mut p = play();
        p.player_mut().lives = 1;
        p.player_mut().score = 120;
        let at = p.player().pos + Vec2::new(4.0, 4.0);
        p.swarm_mut().bullets.bullets.push(at);
        let next = step(&mut p, 0, &mut AudioQueue::new());
        assert!(matches!(next, Some(Transition::Change(InvadersScreen::GameOver))));

        p.on_enter(Some(InvadersScreen::GetReady), &mut AudioQueue::new());
        step(&mut p, 0, &mut AudioQueue::new());
        assert_eq!(p.player().lives, 3);
        assert_eq!(p.player().score, 0);
        assert_eq!(p.swarm().invaders().len(), 70);
    }
}
