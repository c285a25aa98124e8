//! The pipe mini-game played against a hacker.

use fastrand::Rng;
use glam::Vec2;
use log::{info, warn};

use crate::components::timer::Countdown;
use crate::error::GameError;
use crate::events::gamestate::Transition;
use crate::game::{GameState, Tick};
use crate::games::terminals::TerminalsScreen;
use crate::games::terminals::pipes::{Board, BoardLayout, Cell, Dir, PipeKind};
use crate::resources::audio::AudioQueue;
use crate::resources::bitmapfont::BitmapFont;
use crate::resources::surface::{Color, Surface};

/// Pause between solving the board and leaving the screen.
pub const WIN_PAUSE_MS: u32 = 2000;
const PIPE_WIDTH: f32 = 10.0;

pub struct PipeScreen {
    size: usize,
    rng: Rng,
    board: Option<Board>,
    layout: BoardLayout,
    pause: Countdown,
    hover: Option<Cell>,
    font: BitmapFont,
}

impl PipeScreen {
    pub fn new(size: usize, screen: Vec2, rng: Rng, font: BitmapFont) -> Result<Self, GameError> {
        if size < 3 {
            return Err(GameError::BoardTooSmall(size));
        }
        Ok(Self {
            size,
            rng,
            board: None,
            layout: BoardLayout::new(size, screen),
            pause: Countdown::new(WIN_PAUSE_MS),
            hover: None,
            font,
        })
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.board.as_mut()
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }
}

impl GameState<TerminalsScreen> for PipeScreen {
    fn on_enter(&mut self, _previous: Option<TerminalsScreen>, _audio: &mut AudioQueue) {
        match Board::new(self.size, &mut self.rng) {
            Ok(board) => self.board = Some(board),
            Err(e) => warn!("pipe board not built on enter: {}", e),
        }
        self.pause.reset();
        self.hover = None;
    }

    fn on_exit(&mut self, _audio: &mut AudioQueue) {
        self.board = None;
    }

    fn update(
        &mut self,
        tick: &mut Tick<'_>,
    ) -> Result<Option<Transition<TerminalsScreen>>, GameError> {
        if tick.input.action_back.just_pressed {
            info!("pipe game abandoned");
            return Ok(Some(Transition::Change(TerminalsScreen::Play)));
        }
        if self.board.is_none() {
            self.board = Some(Board::new(self.size, &mut self.rng)?);
        }
        let Some(board) = self.board.as_mut() else {
            return Ok(None);
        };

        if board.is_won() {
            self.pause.tick(tick.elapsed_ms);
            if self.pause.is_overdue() {
                info!("pipe game won");
                return Ok(Some(Transition::Change(TerminalsScreen::HackerStopped)));
            }
            return Ok(None);
        }

        self.hover = self.layout.cell_at(tick.input.pointer_position);
        if let Some(cell) = tick.pointer.and_then(|p| self.layout.cell_at(p)) {
            board.rotate(cell);
        }
        Ok(None)
    }

    fn draw(&mut self, surface: &mut Surface) {
        let Some(board) = &self.board else {
            return;
        };
        let size = board.size();
        for row in 0..size {
            for col in 0..size {
                let Some(pipe) = board.get((row, col)) else {
                    continue;
                };
                let rect = self.layout.cell_rect((row, col));
                let fill = match pipe.kind {
                    PipeKind::Empty => Color::BLACK,
                    PipeKind::Start | PipeKind::End => Color::RED,
                    _ if pipe.connected => Color::GREEN,
                    _ => Color::GRAY,
                };
                surface.fill_rect(rect, fill);

                let centre = rect.center();
                for dir in pipe.connections() {
                    let reach = match dir {
                        Dir::North => Vec2::new(0.0, -rect.h / 2.0),
                        Dir::East => Vec2::new(rect.w / 2.0, 0.0),
                        Dir::South => Vec2::new(0.0, rect.h / 2.0),
                        Dir::West => Vec2::new(-rect.w / 2.0, 0.0),
                    };
                    surface.line(centre, centre + reach, PIPE_WIDTH, Color::BLACK);
                }
                if pipe.kind != PipeKind::Empty {
                    surface.circle(centre, PIPE_WIDTH / 2.0, Color::BLACK);
                }

                let highlight = if self.hover == Some((row, col)) {
                    Color::YELLOW
                } else {
                    Color::WHITE
                };
                surface.outline_rect(rect, 1.0, highlight);
            }
        }

        if board.is_won() {
            self.font
                .centre(surface, "ACCESS RESTORED", self.layout.origin.y + 8.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::InputState;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    fn screen() -> PipeScreen {
        PipeScreen::new(6, SCREEN, Rng::with_seed(5), BitmapFont::new("font", 12, 16)).unwrap()
    }

    fn step(
        screen: &mut PipeScreen,
        input: &InputState,
        pointer: Option<Vec2>,
        elapsed_ms: u32,
    ) -> Option<Transition<TerminalsScreen>> {
        let mut audio = AudioQueue::new();
        let mut tick = Tick {
            elapsed_ms,
            pointer,
            input,
            audio: &mut audio,
        };
        screen.update(&mut tick).unwrap()
    }

    #[test]
    fn test_too_small_board_is_a_configuration_error() {
        let err = PipeScreen::new(2, SCREEN, Rng::with_seed(1), BitmapFont::new("font", 12, 16));
        assert!(matches!(err, Err(GameError::BoardTooSmall(2))));
    }

    #[test]
    fn test_click_turns_the_piece_under_the_pointer() {
        let mut s = screen();
        s.on_enter(Some(TerminalsScreen::Play), &mut AudioQueue::new());
        let input = InputState::default();
        let layout = s.layout();

        let board = s.board().unwrap();
        let target = (0..6)
            .flat_map(|r| (0..6).map(move |c| (r, c)))
            .find(|&cell| !board.get(cell).unwrap().is_fixed())
            .unwrap();
        let before = board.get(target).unwrap().quarters;

        let click = layout.cell_rect(target).center();
        assert!(step(&mut s, &input, Some(click), 16).is_none());
        let after = s.board().unwrap().get(target).unwrap().quarters;
        assert_eq!(after, (before + 1) % 4);
    }

    #[test]
    fn test_escape_abandons_and_win_reports_after_pause() {
        let mut s = screen();
        s.on_enter(Some(TerminalsScreen::Play), &mut AudioQueue::new());
        let mut input = InputState::default();
        input.set_key(crate::resources::input::Key::Escape, true);
        assert!(matches!(
            step(&mut s, &input, None, 16),
            Some(Transition::Change(TerminalsScreen::Play))
        ));

        s.on_enter(Some(TerminalsScreen::Play), &mut AudioQueue::new());
        let input = InputState::default();
        s.board_mut().unwrap().solve();
        assert!(s.board().unwrap().is_won());

        assert!(step(&mut s, &input, None, WIN_PAUSE_MS).is_none());
        assert!(matches!(
            step(&mut s, &input, None, 1),
            Some(Transition::Change(TerminalsScreen::HackerStopped))
        ));
    }
}
