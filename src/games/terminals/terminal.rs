//! Terminals the player defends.

use glam::Vec2;
use log::debug;

use crate::components::rect::Rect;
use crate::components::statemachine::{Keyed, State, StateMachine};
use crate::components::timer::Countdown;
use crate::error::StateMachineError;
use crate::resources::audio::AudioQueue;

pub const TERMINAL_SIZE: f32 = 64.0;
pub const HACKING_COUNTDOWN_MS: u32 = 10_000;
pub const UNHACKABLE_MS: u32 = 3000;
pub const FIXING_SCORE: i32 = 10;
pub const ALERT_SOUND: &str = "hackeralert";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalState {
    Active,
    /// A hacker is working on it; compromised when the countdown runs out.
    BeingHacked,
    /// The player is fighting the hacker in the pipe game.
    Fixing,
    /// Just fixed; no hacker can pick it for a while.
    Unhackable,
    Compromised,
}

impl Keyed for TerminalState {
    type Key = TerminalState;

    fn key(&self) -> TerminalState {
        *self
    }
}

/// Score and lives of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: i32,
    pub lives: u32,
}

pub struct TerminalAgent<'a> {
    pub timer: &'a mut Countdown,
    pub board: &'a mut Scoreboard,
    pub audio: &'a mut AudioQueue,
}

impl<'a> State<TerminalAgent<'a>> for TerminalState {
    fn entry_actions(&mut self, agent: &mut TerminalAgent<'a>) {
        match self {
            TerminalState::BeingHacked => {
                agent.timer.restart(HACKING_COUNTDOWN_MS);
                agent.audio.play_fx(ALERT_SOUND);
            }
            TerminalState::Unhackable => {
                agent.timer.restart(UNHACKABLE_MS);
                agent.board.score += FIXING_SCORE;
            }
            TerminalState::Compromised => {
                agent.board.lives = agent.board.lives.saturating_sub(1);
                agent.board.score -= FIXING_SCORE;
            }
            TerminalState::Active | TerminalState::Fixing => {}
        }
    }

    fn do_actions(&mut self, agent: &mut TerminalAgent<'a>, elapsed_ms: u32) {
        if matches!(self, TerminalState::BeingHacked | TerminalState::Unhackable) {
            agent.timer.tick(elapsed_ms);
        }
    }

    fn check_conditions(&mut self, agent: &mut TerminalAgent<'a>) -> Option<TerminalState> {
        match self {
            TerminalState::BeingHacked if agent.timer.is_done() => Some(TerminalState::Compromised),
            TerminalState::Unhackable if agent.timer.is_done() => Some(TerminalState::Active),
            _ => None,
        }
    }
}

pub struct Terminal {
    pub name: String,
    /// Centre of the terminal.
    pub pos: Vec2,
    pub timer: Countdown,
    brain: StateMachine<TerminalState>,
}

impl Terminal {
    pub fn new(name: impl Into<String>, pos: Vec2) -> Result<Self, StateMachineError> {
        let mut brain = StateMachine::new()
            .with_state(TerminalState::Active)?
            .with_state(TerminalState::BeingHacked)?
            .with_state(TerminalState::Fixing)?
            .with_state(TerminalState::Unhackable)?
            .with_state(TerminalState::Compromised)?;
        let mut timer = Countdown::expired();
        let mut board = Scoreboard { score: 0, lives: 0 };
        let mut audio = AudioQueue::new();
        brain.set_state(
            TerminalState::Active,
            &mut TerminalAgent {
                timer: &mut timer,
                board: &mut board,
                audio: &mut audio,
            },
        )?;
        Ok(Self {
            name: name.into(),
            pos,
            timer,
            brain,
        })
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, TERMINAL_SIZE, TERMINAL_SIZE)
    }

    /// Where a hacker stands to work on this terminal: just below it.
    pub fn workstation(&self) -> Vec2 {
        self.pos + Vec2::new(0.0, TERMINAL_SIZE)
    }

    pub fn state(&self) -> TerminalState {
        self.brain.active_key().unwrap_or(TerminalState::Active)
    }

    pub fn set_state(
        &mut self,
        state: TerminalState,
        board: &mut Scoreboard,
        audio: &mut AudioQueue,
    ) -> Result<(), StateMachineError> {
        debug!("{}: {:?} -> {:?}", self.name, self.state(), state);
        self.brain.set_state(
            state,
            &mut TerminalAgent {
                timer: &mut self.timer,
                board,
                audio,
            },
        )
    }

    pub fn think(
        &mut self,
        elapsed_ms: u32,
        board: &mut Scoreboard,
        audio: &mut AudioQueue,
    ) -> Result<(), StateMachineError> {
        self.brain.think(
            &mut TerminalAgent {
                timer: &mut self.timer,
                board,
                audio,
            },
            elapsed_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Scoreboard {
        Scoreboard { score: 0, lives: 3 }
    }

    #[test]
    fn test_unattended_hack_compromises_the_terminal() {
        let mut t = Terminal::new("Terminal 1", Vec2::ZERO).unwrap();
        let mut b = board();
        let mut audio = AudioQueue::new();
        t.set_state(TerminalState::BeingHacked, &mut b, &mut audio).unwrap();
        assert_eq!(audio.drain().len(), 1);

        t.think(9999, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::BeingHacked);
        t.think(1, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::Compromised);
        assert_eq!(b, Scoreboard { score: -10, lives: 2 });

        // stays compromised
        t.think(100_000, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::Compromised);
    }

    #[test]
    fn test_fixing_freezes_the_countdown() {
        let mut t = Terminal::new("Terminal 1", Vec2::ZERO).unwrap();
        let mut b = board();
        let mut audio = AudioQueue::new();
        t.set_state(TerminalState::BeingHacked, &mut b, &mut audio).unwrap();
        t.set_state(TerminalState::Fixing, &mut b, &mut audio).unwrap();
        t.think(60_000, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::Fixing);
        assert_eq!(b.lives, 3);
    }

    #[test]
    fn test_fixed_terminal_scores_and_reactivates() {
        let mut t = Terminal::new("Terminal 1", Vec2::ZERO).unwrap();
        let mut b = board();
        let mut audio = AudioQueue::new();
        t.set_state(TerminalState::Unhackable, &mut b, &mut audio).unwrap();
        assert_eq!(b.score, 10);
        t.think(2999, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::Unhackable);
        t.think(1, &mut b, &mut audio).unwrap();
        assert_eq!(t.state(), TerminalState::Active);
    }
}
