//! Terminals play screen: the room, the round clock and the way back from
//! the pipe game.

use fastrand::Rng;
use glam::Vec2;
use log::info;

use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::games::terminals::TerminalsScreen;
use crate::games::terminals::room::Room;
use crate::games::terminals::terminal::Scoreboard;
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::surface::Surface;
use crate::screens::interstitial::Interstitial;

pub const MUSIC: &str = "theme";
pub const MUSIC_VOLUME: f32 = 0.3;
pub const RESULTS_MS: u32 = 10_000;

/// What entering the screen means for the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    NewGame,
    /// Back from the menu in the middle of a round.
    Resume,
    FightWon,
    FightAbandoned,
}

#[derive(Debug, Clone, Copy)]
pub struct RoomSettings {
    pub size: Vec2,
    pub terminals: usize,
    pub hackers: usize,
    pub max_time_ms: u32,
}

pub struct PlayScreen {
    settings: RoomSettings,
    rng: Rng,
    room: Room,
    elapsed_ms: u32,
    entry: Option<Entry>,
    started: bool,
    finished: bool,
    font: BitmapFont,
}

impl PlayScreen {
    pub fn new(settings: RoomSettings, mut rng: Rng, font: BitmapFont) -> Result<Self, GameError> {
        let room = Room::new(
            settings.size,
            settings.terminals,
            settings.hackers,
            Rng::with_seed(rng.u64(..)),
        )?;
        Ok(Self {
            settings,
            rng,
            room,
            elapsed_ms: 0,
            entry: None,
            started: false,
            finished: false,
            font,
        })
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn room_mut(&mut self) -> &mut Room {
        &mut self.room
    }

    pub fn time_left_ms(&self) -> u32 {
        self.settings.max_time_ms.saturating_sub(self.elapsed_ms)
    }

    fn new_game(&mut self, audio: &mut AudioQueue) -> Result<(), GameError> {
        info!("terminals: new game");
        self.room.silence(audio);
        self.room = Room::new(
            self.settings.size,
            self.settings.terminals,
            self.settings.hackers,
            Rng::with_seed(self.rng.u64(..)),
        )?;
        self.elapsed_ms = 0;
        self.started = true;
        self.finished = false;
        Ok(())
    }

    fn results(&mut self, audio: &mut AudioQueue) -> Transition<TerminalsScreen> {
        self.finished = true;
        self.room.silence(audio);
        audio.stop_music(MUSIC);
        let board = self.room.board();
        info!(
            "terminals: round over, score {} with {} of {} terminals",
            board.score, board.lives, self.settings.terminals
        );
        let message = results_message(board, self.settings.terminals as u32);
        Transition::Replace(
            TerminalsScreen::Results,
            Box::new(Interstitial::new(
                message,
                RESULTS_MS,
                Some(TerminalsScreen::GameOver),
                self.font.clone(),
            )),
        )
    }
}

/// Closing words for a round.
pub fn results_message(board: Scoreboard, terminals: u32) -> &'static str {
    if board.lives == 0 {
        "You have failed us soldier!!!\n\nAll our machines have been compromised!\nYou were USELESS out there!\n\nWe will never recover from this."
    } else if board.lives >= terminals {
        "Well done soldier!!!\n\nYou have successfully defended all our machines!\n\nWe will never forget your bravery!"
    } else if board.score >= 0 {
        "Well done soldier!\n\nSome machines have been compromised, but you helped save some.\n\nWe live to fight another day."
    } else {
        "You have failed us soldier!!!\n\nSome machines have been compromised but at least not all.\n\nYou need to do better next time."
    }
}

impl GameState<TerminalsScreen> for PlayScreen {
    fn on_enter(&mut self, previous: Option<TerminalsScreen>, audio: &mut AudioQueue) {
        self.entry = match previous {
            Some(TerminalsScreen::HackerStopped) => Some(Entry::FightWon),
            Some(TerminalsScreen::PipeGame) => Some(Entry::FightAbandoned),
            Some(TerminalsScreen::MainMenu) if self.started && !self.finished => {
                Some(Entry::Resume)
            }
            _ => Some(Entry::NewGame),
        };
        if matches!(self.entry, Some(Entry::NewGame | Entry::Resume)) {
            audio.play_music(MUSIC, true);
            audio.volume_music(MUSIC, MUSIC_VOLUME);
        }
    }

    /// The pipe game and the menu run without the room's loops.
    fn on_exit(&mut self, audio: &mut AudioQueue) {
        self.room.silence(audio);
    }

    fn update(
        &mut self,
        tick: &mut Tick<'_>,
    ) -> Result<Option<Transition<TerminalsScreen>>, GameError> {
        match self.entry.take() {
            Some(Entry::NewGame) => self.new_game(tick.audio)?,
            Some(Entry::Resume) => self.room.resume_sounds(tick.audio),
            Some(Entry::FightWon) => {
                self.room.win_fight(tick.audio)?;
                self.room.resume_sounds(tick.audio);
            }
            Some(Entry::FightAbandoned) => {
                self.room.abandon_fight(tick.audio)?;
                self.room.resume_sounds(tick.audio);
            }
            None => {}
        }

        if tick.input.action_back.just_pressed {
            tick.audio.stop_music(MUSIC);
            return Ok(Some(Transition::Change(TerminalsScreen::MainMenu)));
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(tick.elapsed_ms);
        if self.room.update(tick.elapsed_ms, tick.input, tick.audio)? {
            return Ok(Some(Transition::Change(TerminalsScreen::PipeGame)));
        }

        if self.room.board().lives == 0 || self.elapsed_ms >= self.settings.max_time_ms {
            return Ok(Some(self.results(tick.audio)));
        }
        Ok(None)
    }

    fn draw(&mut self, surface: &mut Surface) {
        let time_left = self.time_left_ms();
        self.room.render(surface, &self.font, time_left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::audio::AudioCmd;
    use crate::games::font;
    use crate::games::terminals::hacker::{HACKING_SOUND, Hacker, HackerMode};
    use crate::games::terminals::player::PLAYER_SIZE;
    use crate::games::terminals::terminal::TerminalState;
    use crate::resources::input::{InputState, Key};

    fn settings(hackers: usize) -> RoomSettings {
        RoomSettings {
            size: Vec2::new(800.0, 600.0),
            terminals: 3,
            hackers,
            max_time_ms: 5000,
        }
    }

    fn step(
        screen: &mut PlayScreen,
        input: &InputState,
        elapsed_ms: u32,
        audio: &mut AudioQueue,
    ) -> Option<Transition<TerminalsScreen>> {
        let mut tick = Tick {
            elapsed_ms,
            pointer: None,
            input,
            audio,
        };
        screen.update(&mut tick).unwrap()
    }

    #[test]
    fn test_results_messages_by_outcome() {
        let lost = results_message(Scoreboard { score: -30, lives: 0 }, 3);
        assert!(lost.contains("All our machines"));
        let perfect = results_message(Scoreboard { score: 20, lives: 3 }, 3);
        assert!(perfect.starts_with("Well done soldier!!!"));
        let partial = results_message(Scoreboard { score: 0, lives: 1 }, 3);
        assert!(partial.contains("We live to fight another day."));
        let poor = results_message(Scoreboard { score: -10, lives: 2 }, 3);
        assert!(poor.contains("You need to do better"));
    }

    #[test]
    fn test_new_game_starts_the_music_and_time_up_shows_results() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        assert!(audio.pending().contains(&AudioCmd::PlayMusic {
            id: MUSIC.to_string(),
            looped: true
        }));

        let input = InputState::default();
        assert!(step(&mut p, &input, 4999, &mut audio).is_none());
        let done = step(&mut p, &input, 1, &mut audio);
        assert!(matches!(
            done,
            Some(Transition::Replace(TerminalsScreen::Results, _))
        ));
        assert!(audio.pending().contains(&AudioCmd::StopMusic {
            id: MUSIC.to_string()
        }));
    }

    #[test]
    fn test_menu_and_back_resumes_the_round() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        let mut input = InputState::default();
        step(&mut p, &input, 1000, &mut audio);

        input.set_key(Key::Escape, true);
        assert!(matches!(
            step(&mut p, &input, 16, &mut audio),
            Some(Transition::Change(TerminalsScreen::MainMenu))
        ));

        p.on_enter(Some(TerminalsScreen::MainMenu), &mut audio);
        step(&mut p, &InputState::default(), 0, &mut audio);
        assert_eq!(p.time_left_ms(), 4000);
    }

    /// Put a hacker at terminal 0 and leave it hacking.
    fn hack_terminal_0(p: &mut PlayScreen, audio: &mut AudioQueue) {
        let room = p.room_mut();
        // out of reach, so no fight starts on its own
        room.player_mut().pos = Vec2::new(PLAYER_SIZE / 2.0, PLAYER_SIZE / 2.0);
        let at = room.terminals()[0].workstation();
        let hacker = room.spawn_hacker(at).unwrap();
        room.world_mut().get_mut::<Hacker>(hacker).unwrap().target = Some(0);
        room.start_fight_with(hacker, audio).unwrap();
        room.abandon_fight(audio).unwrap();
        assert_eq!(room.hacker_modes(), vec![HackerMode::Hacking]);
    }

    fn last_hacking_cmd(cmds: &[AudioCmd]) -> Option<&AudioCmd> {
        cmds.iter().rev().find(|cmd| {
            matches!(cmd, AudioCmd::LoopFx { id } | AudioCmd::StopFx { id } if id == HACKING_SOUND)
        })
    }

    #[test]
    fn test_menu_silences_the_room_and_a_new_game_stays_silent() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        step(&mut p, &InputState::default(), 16, &mut audio);
        hack_terminal_0(&mut p, &mut audio);
        assert_eq!(
            last_hacking_cmd(&audio.drain()),
            Some(&AudioCmd::LoopFx {
                id: HACKING_SOUND.to_string()
            })
        );

        let mut input = InputState::default();
        input.set_key(Key::Escape, true);
        assert!(matches!(
            step(&mut p, &input, 16, &mut audio),
            Some(Transition::Change(TerminalsScreen::MainMenu))
        ));
        p.on_exit(&mut audio);
        let cmds = audio.drain();
        assert!(cmds.contains(&AudioCmd::StopMusic {
            id: MUSIC.to_string()
        }));
        assert_eq!(
            last_hacking_cmd(&cmds),
            Some(&AudioCmd::StopFx {
                id: HACKING_SOUND.to_string()
            })
        );

        // "Start" from the menu: a fresh room with nobody hacking
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        step(&mut p, &InputState::default(), 16, &mut audio);
        assert!(p.room_mut().hacker_modes().is_empty());
        let cmds = audio.drain();
        assert!(!matches!(
            last_hacking_cmd(&cmds),
            Some(AudioCmd::LoopFx { .. })
        ));
    }

    #[test]
    fn test_resuming_from_the_menu_restarts_music_and_loops() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        step(&mut p, &InputState::default(), 16, &mut audio);
        hack_terminal_0(&mut p, &mut audio);
        p.on_exit(&mut audio);
        audio.drain();

        p.on_enter(Some(TerminalsScreen::MainMenu), &mut audio);
        step(&mut p, &InputState::default(), 16, &mut audio);
        let cmds = audio.drain();
        assert!(cmds.contains(&AudioCmd::PlayMusic {
            id: MUSIC.to_string(),
            looped: true
        }));
        assert_eq!(
            last_hacking_cmd(&cmds),
            Some(&AudioCmd::LoopFx {
                id: HACKING_SOUND.to_string()
            })
        );
        assert_eq!(p.room_mut().hacker_modes(), vec![HackerMode::Hacking]);
    }

    #[test]
    fn test_resume_before_any_round_starts_a_new_game() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::MainMenu), &mut audio);
        assert!(audio.pending().contains(&AudioCmd::PlayMusic {
            id: MUSIC.to_string(),
            looped: true
        }));
        step(&mut p, &InputState::default(), 16, &mut audio);
        assert_eq!(p.time_left_ms(), 4984);

        // once started, the menu round trip resumes instead
        p.on_enter(Some(TerminalsScreen::MainMenu), &mut audio);
        step(&mut p, &InputState::default(), 16, &mut audio);
        assert_eq!(p.time_left_ms(), 4968);
    }

    #[test]
    fn test_coming_back_from_a_won_pipe_game_frees_the_terminal() {
        let mut p = PlayScreen::new(settings(0), Rng::with_seed(1), font()).unwrap();
        let mut audio = AudioQueue::new();
        p.on_enter(Some(TerminalsScreen::GetReady), &mut audio);
        let input = InputState::default();
        step(&mut p, &input, 16, &mut audio);

        let room = p.room_mut();
        let at = room.terminals()[0].workstation();
        let hacker = room.spawn_hacker(at).unwrap();
        room.world_mut().get_mut::<Hacker>(hacker).unwrap().target = Some(0);
        room.start_fight_with(hacker, &mut audio).unwrap();
        assert_eq!(room.terminals()[0].state(), TerminalState::Fixing);

        p.on_enter(Some(TerminalsScreen::HackerStopped), &mut audio);
        step(&mut p, &input, 16, &mut audio);
        assert_eq!(p.room().terminals()[0].state(), TerminalState::Unhackable);
        assert_eq!(p.room().board().score, 10);
        assert_eq!(p.room_mut().hacker_modes(), vec![HackerMode::Wandering]);
    }
}
