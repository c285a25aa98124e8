//! Pipe puzzle board.
//!
//! A square grid of pipe pieces. A path of pieces is laid from a start cell in
//! the top-left corner to an end cell on the bottom or right edge, then every
//! piece is given a random rotation. The player rotates pieces until water
//! flows from the start to the end.

use arrayvec::ArrayVec;
use fastrand::Rng;
use glam::Vec2;
use std::collections::VecDeque;

use crate::components::rect::Rect;
use crate::error::GameError;

pub const BOARD_SIZE: usize = 6;
/// Chance in percent that a path cell gets a T-joint.
const TEE_CHANCE: u32 = 20;
/// Chance in percent that a cell off the path stays empty.
const EMPTY_CHANCE: u32 = 25;

pub type Cell = (usize, usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    North,
    East,
    South,
    West,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    fn index(self) -> u8 {
        match self {
            Dir::North => 0,
            Dir::East => 1,
            Dir::South => 2,
            Dir::West => 3,
        }
    }

    pub fn opposite(self) -> Dir {
        self.turned(2)
    }

    /// This direction after `quarters` clockwise quarter turns.
    pub fn turned(self, quarters: u8) -> Dir {
        Dir::ALL[((self.index() + quarters) % 4) as usize]
    }

    /// Neighbour of `cell` this way, if it is on a `size`×`size` board.
    pub fn step(self, (row, col): Cell, size: usize) -> Option<Cell> {
        let next = match self {
            Dir::North => (row.checked_sub(1)?, col),
            Dir::East => (row, col + 1),
            Dir::South => (row + 1, col),
            Dir::West => (row, col.checked_sub(1)?),
        };
        (next.0 < size && next.1 < size).then_some(next)
    }

    /// Direction leading from `from` to the adjacent cell `to`.
    pub fn between(from: Cell, to: Cell) -> Option<Dir> {
        Dir::ALL
            .into_iter()
            .find(|d| d.step(from, usize::MAX) == Some(to))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipeKind {
    Straight,
    Corner,
    Tee,
    Start,
    End,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pipe {
    pub kind: PipeKind,
    /// Clockwise quarter turns, 0..4.
    pub quarters: u8,
    /// Water reaches this piece.
    pub connected: bool,
}

impl Pipe {
    pub fn new(kind: PipeKind, quarters: u8) -> Self {
        Self {
            kind,
            quarters: quarters % 4,
            connected: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(PipeKind::Empty, 0)
    }

    /// A start or end piece opening towards `dir`.
    fn endpoint(kind: PipeKind, dir: Dir) -> Self {
        Self::new(kind, dir.index())
    }

    /// Sides this piece opens to.
    pub fn connections(&self) -> ArrayVec<Dir, 4> {
        let base: &[Dir] = match self.kind {
            PipeKind::Straight => &[Dir::North, Dir::South],
            PipeKind::Corner => &[Dir::North, Dir::East],
            PipeKind::Tee => &[Dir::North, Dir::East, Dir::West],
            PipeKind::Start | PipeKind::End => &[Dir::North],
            PipeKind::Empty => &[],
        };
        base.iter().map(|d| d.turned(self.quarters)).collect()
    }

    pub fn opens(&self, dir: Dir) -> bool {
        self.connections().contains(&dir)
    }

    /// Endpoints and empty cells cannot be turned.
    pub fn is_fixed(&self) -> bool {
        matches!(
            self.kind,
            PipeKind::Start | PipeKind::End | PipeKind::Empty
        )
    }
}

pub struct Board {
    size: usize,
    cells: Vec<Pipe>,
    start: Cell,
    end: Cell,
    path: Vec<Cell>,
    won: bool,
}

impl Board {
    /// A fresh random puzzle.
    pub fn new(size: usize, rng: &mut Rng) -> Result<Self, GameError> {
        if size < 3 {
            return Err(GameError::BoardTooSmall(size));
        }
        let starts = [(0, 0), (0, 1), (1, 0)];
        let ends: Vec<Cell> = (size / 2 + 1..size)
            .map(|col| (size - 1, col))
            .chain((size / 2 + 1..size).map(|row| (row, size - 1)))
            .collect();
        let start = starts[rng.usize(..starts.len())];
        let end = ends[rng.usize(..ends.len())];
        let path = find_path(size, start, end, rng)
            .ok_or_else(|| GameError::Config(format!("no pipe path from {:?} to {:?}", start, end)))?;

        let mut board = Self::from_cells(size, vec![Pipe::empty(); size * size], start, end)?;
        board.path = path;
        board.lay_path(rng);
        board.fill(rng);
        board.update_connections();
        Ok(board)
    }

    /// A board with the given pieces, for hand-made puzzles. `cells` is
    /// row-major and both endpoints must lie on the board.
    pub fn from_cells(
        size: usize,
        cells: Vec<Pipe>,
        start: Cell,
        end: Cell,
    ) -> Result<Self, GameError> {
        if size < 3 {
            return Err(GameError::BoardTooSmall(size));
        }
        if cells.len() != size * size {
            return Err(GameError::InvalidBoard(format!(
                "{} cells for a {}x{} board",
                cells.len(),
                size,
                size
            )));
        }
        for cell in [start, end] {
            if cell.0 >= size || cell.1 >= size {
                return Err(GameError::InvalidBoard(format!(
                    "cell {:?} is off a {}x{} board",
                    cell, size, size
                )));
            }
        }
        let mut board = Self {
            size,
            cells,
            start,
            end,
            path: Vec::new(),
            won: false,
        };
        board.update_connections();
        Ok(board)
    }

    fn lay_path(&mut self, rng: &mut Rng) {
        let last = self.path.len() - 1;
        for (i, &cell) in self.path.iter().enumerate() {
            let pipe = if i == 0 {
                let towards = Dir::between(cell, self.path[1]).unwrap_or(Dir::South);
                Pipe::endpoint(PipeKind::Start, towards)
            } else if i == last {
                let towards = Dir::between(cell, self.path[i - 1]).unwrap_or(Dir::North);
                Pipe::endpoint(PipeKind::End, towards)
            } else {
                let back = Dir::between(cell, self.path[i - 1]);
                let ahead = Dir::between(cell, self.path[i + 1]);
                let kind = if rng.u32(..100) < TEE_CHANCE {
                    PipeKind::Tee
                } else if back.map(Dir::opposite) == ahead {
                    PipeKind::Straight
                } else {
                    PipeKind::Corner
                };
                Pipe::new(kind, rng.u8(..4))
            };
            self.cells[cell.0 * self.size + cell.1] = pipe;
        }
    }

    fn fill(&mut self, rng: &mut Rng) {
        for index in 0..self.cells.len() {
            let cell = (index / self.size, index % self.size);
            if self.path.contains(&cell) {
                continue;
            }
            self.cells[index] = if rng.u32(..100) < EMPTY_CHANCE {
                Pipe::empty()
            } else {
                let kinds = [PipeKind::Straight, PipeKind::Corner, PipeKind::Tee];
                Pipe::new(kinds[rng.usize(..kinds.len())], rng.u8(..4))
            };
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    /// Cells of the path the puzzle was laid along, start to end.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn get(&self, (row, col): Cell) -> Option<&Pipe> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col)
    }

    /// Turn the piece at `cell` a quarter clockwise. Returns whether anything
    /// turned; fixed pieces and a solved board stay as they are.
    pub fn rotate(&mut self, cell: Cell) -> bool {
        if self.won {
            return false;
        }
        let size = self.size;
        let Some(pipe) = self.cells.get_mut(cell.0 * size + cell.1) else {
            return false;
        };
        if cell.1 >= size || pipe.is_fixed() {
            return false;
        }
        pipe.quarters = (pipe.quarters + 1) % 4;
        self.update_connections();
        true
    }

    /// Flood from the start through matching openings and mark what water
    /// reaches. Returns whether the end was reached.
    pub fn update_connections(&mut self) -> bool {
        for pipe in &mut self.cells {
            pipe.connected = false;
        }
        let mut queue = VecDeque::from([self.start]);
        let mut seen = vec![false; self.cells.len()];
        seen[self.start.0 * self.size + self.start.1] = true;
        while let Some(cell) = queue.pop_front() {
            let Some(pipe) = self.get(cell).copied() else {
                continue;
            };
            self.cells[cell.0 * self.size + cell.1].connected = true;
            for dir in pipe.connections() {
                let Some(next) = dir.step(cell, self.size) else {
                    continue;
                };
                let index = next.0 * self.size + next.1;
                if !seen[index] && self.cells[index].opens(dir.opposite()) {
                    seen[index] = true;
                    queue.push_back(next);
                }
            }
        }
        self.won = self
            .get(self.end)
            .is_some_and(|pipe| pipe.connected);
        self.won
    }
}

#[cfg(test)]
impl Board {
    /// Turn every path piece until it joins its neighbours on the path.
    pub(crate) fn solve(&mut self) {
        let path = self.path.clone();
        for i in 1..path.len().saturating_sub(1) {
            let (Some(back), Some(ahead)) = (
                Dir::between(path[i], path[i - 1]),
                Dir::between(path[i], path[i + 1]),
            ) else {
                continue;
            };
            for _ in 0..4 {
                let Some(pipe) = self.get(path[i]) else {
                    break;
                };
                if self.won || (pipe.opens(back) && pipe.opens(ahead)) {
                    break;
                }
                self.rotate(path[i]);
            }
        }
    }
}

/// Random depth-first walk from `start` to `end`.
fn find_path(size: usize, start: Cell, end: Cell, rng: &mut Rng) -> Option<Vec<Cell>> {
    let mut visited = vec![false; size * size];
    visited[start.0 * size + start.1] = true;
    let mut stack = vec![vec![start]];
    while let Some(path) = stack.pop() {
        let current = *path.last()?;
        if current == end {
            return Some(path);
        }
        let mut dirs = Dir::ALL;
        rng.shuffle(&mut dirs);
        for dir in dirs {
            let Some(next) = dir.step(current, size) else {
                continue;
            };
            let index = next.0 * size + next.1;
            if !visited[index] {
                visited[index] = true;
                let mut longer = path.clone();
                longer.push(next);
                stack.push(longer);
            }
        }
    }
    None
}

/// Where the board sits on screen: square cells, centred.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin: Vec2,
    pub cell: f32,
    pub size: usize,
}

impl BoardLayout {
    pub fn new(size: usize, screen: Vec2) -> Self {
        let cell = (screen.x.min(screen.y) / size.max(1) as f32).floor();
        let extent = cell * size as f32;
        Self {
            origin: Vec2::new((screen.x - extent) / 2.0, (screen.y - extent) / 2.0),
            cell,
            size,
        }
    }

    pub fn cell_rect(&self, (row, col): Cell) -> Rect {
        Rect::new(
            self.origin.x + col as f32 * self.cell,
            self.origin.y + row as f32 * self.cell,
            self.cell,
            self.cell,
        )
    }

    pub fn cell_at(&self, point: Vec2) -> Option<Cell> {
        let local = (point - self.origin) / self.cell;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (row, col) = (local.y as usize, local.x as usize);
        (row < self.size && col < self.size).then_some((row, col))
    }
}
