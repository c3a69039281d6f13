use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A cell on the play grid. Signed so an off-grid candidate head is
/// representable before the wall check rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

/// Cardinal movement direction. y grows downward, matching screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset for one tick of movement.
    pub fn vector(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// What ended the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Wall,
    Body,
}

/// Outcome of advancing the grid by one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Moved,
    Ate,
    Collision(CollisionKind),
}

/// The grid model: snake segments (head at the front), the food cell, and the
/// RNG that places food. Owns all movement and collision rules.
#[derive(Debug)]
pub struct Grid {
    pub(crate) size: i16,
    pub(crate) segments: VecDeque<Position>,
    pub(crate) food: Position,
    rng: StdRng,
}

impl Grid {
    /// Fresh grid: a single segment at the center, food somewhere else.
    pub fn new(size: i16, rng: StdRng) -> Self {
        let center = Position {
            x: size / 2,
            y: size / 2,
        };
        let mut grid = Self {
            size,
            segments: VecDeque::from([center]),
            food: center,
            rng,
        };
        grid.food = grid.sample_free_cell();
        grid
    }

    pub fn size(&self) -> i16 {
        self.size
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn food(&self) -> Position {
        self.food
    }

    /// Advance the snake one cell in `direction`.
    ///
    /// Checks run in order: wall, then body (with the tail excluded on a
    /// non-growing move, because the tail vacates its cell the same tick the
    /// head would enter it), then growth. Eating prepends the head and keeps
    /// the tail; a plain move prepends and pops.
    pub fn step(&mut self, direction: Direction) -> StepResult {
        let (dx, dy) = direction.vector();
        let head = self.segments[0];
        let next = Position {
            x: head.x + dx,
            y: head.y + dy,
        };

        if next.x < 0 || next.x >= self.size || next.y < 0 || next.y >= self.size {
            return StepResult::Collision(CollisionKind::Wall);
        }

        let grows = next == self.food;
        let blocking = if grows {
            self.segments.len()
        } else {
            self.segments.len() - 1
        };
        if self.segments.iter().take(blocking).any(|&s| s == next) {
            return StepResult::Collision(CollisionKind::Body);
        }

        self.segments.push_front(next);
        if grows {
            self.food = self.sample_free_cell();
            StepResult::Ate
        } else {
            self.segments.pop_back();
            StepResult::Moved
        }
    }

    /// Rejection sampling: draw uniform cells until one misses the snake.
    /// Terminates only while a free cell exists; behavior on a fully
    /// occupied grid is deliberately left undefined (see DESIGN.md).
    fn sample_free_cell(&mut self) -> Position {
        loop {
            let candidate = Position {
                x: self.rng.random_range(0..self.size),
                y: self.rng.random_range(0..self.size),
            };
            if !self.segments.contains(&candidate) {
                return candidate;
            }
        }
    }
}
