use serde::{Deserialize, Serialize};

pub mod game;
pub mod generate;
pub mod grid;
pub mod level;
pub mod search;

pub use game::{Game, LevelState, MoveOutcome};
pub use generate::generate;
pub use grid::{CellKind, Grid};
pub use level::{LEVELS, LevelError, LevelSpec};
pub use search::is_reachable;

/// Represents a 2D coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Returns the neighboring position one step in `direction`, or `None`
    /// if that step leaves an N-by-N board.
    pub fn step(self, direction: Direction, size: usize) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x < size && y < size {
            Some(Position { x, y })
        } else {
            None
        }
    }
}

/// A single cardinal move command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit vector for this direction. `y` grows downward.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}
