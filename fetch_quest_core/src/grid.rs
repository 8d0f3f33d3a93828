use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Position;

/// The contents of a single board cell. A cell holds exactly one kind;
/// the agent, items, and terrain are never stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Wall,
    Agent,
    Goal,
    Key,
    Door,
    Obstacle,
}

/// A square board of cells.
///
/// Stores elements of type `T` in a flat vector using row-major order and
/// provides access via [`Position`] coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Creates a new `size` x `size` grid filled with default values.
    pub fn new(size: usize) -> Self
    where
        T: Default + Clone,
    {
        Grid {
            size,
            cells: vec![T::default(); size * size],
        }
    }

    /// Returns the side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks whether the position lies on the board.
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    #[inline]
    fn index_of(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y * self.size + pos.x)
        } else {
            None
        }
    }

    /// Gets an immutable reference to the cell at `pos`, or `None` if the
    /// position is off the board.
    pub fn get(&self, pos: Position) -> Option<&T> {
        let index = self.index_of(pos)?;
        self.cells.get(index)
    }

    /// Gets a mutable reference to the cell at `pos`, or `None` if the
    /// position is off the board.
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut T> {
        let index = self.index_of(pos)?;
        self.cells.get_mut(index)
    }

    /// Returns an iterator that yields `(Position, &T)` for each cell in
    /// row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &T)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (Position::new(index % size, index / size), cell))
    }
}

impl<T> Index<Position> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, pos: Position) -> &Self::Output {
        match self.index_of(pos) {
            Some(index) => &self.cells[index],
            None => panic!(
                "Grid index ({}, {}) out of bounds for board size {}",
                pos.x, pos.y, self.size
            ),
        }
    }
}

impl<T> IndexMut<Position> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, pos: Position) -> &mut Self::Output {
        let size = self.size;
        match self.index_of(pos) {
            Some(index) => &mut self.cells[index],
            None => panic!(
                "Grid index ({}, {}) out of bounds for board size {}",
                pos.x, pos.y, size
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_empty() {
        let grid: Grid<CellKind> = Grid::new(4);
        assert_eq!(grid.size(), 4);
        assert!(grid.cells().all(|(_, &cell)| cell == CellKind::Empty));
        assert_eq!(grid.cells().count(), 16);
    }

    #[test]
    fn position_indexing_round_trips() {
        let mut grid: Grid<CellKind> = Grid::new(5);
        let pos = Position::new(3, 1);
        grid[pos] = CellKind::Key;
        assert_eq!(grid[pos], CellKind::Key);
        assert_eq!(grid.get(pos), Some(&CellKind::Key));
        assert_eq!(grid[Position::new(1, 3)], CellKind::Empty);
    }

    #[test]
    fn get_rejects_out_of_bounds() {
        let grid: Grid<CellKind> = Grid::new(4);
        assert_eq!(grid.get(Position::new(4, 0)), None);
        assert_eq!(grid.get(Position::new(0, 4)), None);
        assert!(!grid.contains(Position::new(4, 4)));
    }
}
