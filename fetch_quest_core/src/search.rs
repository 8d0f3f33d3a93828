use std::collections::{HashSet, VecDeque};

use crate::{
    Direction, Position,
    grid::{CellKind, Grid},
};

/// Decides whether at least one goal can be reached from `start`.
///
/// Breadth-first search over `(position, key_held)` pairs. The key flag is
/// tracked per path, not globally: a cell behind a door is reachable only
/// along paths that actually collect a key first, so the same position is
/// revisited in the key-held branch when necessary. The state space is
/// bounded by `size * size * 2`, so the search always terminates.
///
/// Walls and obstacles block, doors pass only while a key is held, keys
/// pass and set the flag, empty and goal cells always pass.
pub fn is_reachable(
    grid: &Grid<CellKind>,
    start: Position,
    goals: &HashSet<Position>,
    starting_key: bool,
) -> bool {
    let mut visited: HashSet<(Position, bool)> = HashSet::new();
    let mut frontier: VecDeque<(Position, bool)> = VecDeque::new();
    frontier.push_back((start, starting_key));

    while let Some((pos, key_held)) = frontier.pop_front() {
        if !visited.insert((pos, key_held)) {
            continue;
        }
        if goals.contains(&pos) {
            return true;
        }
        for direction in Direction::ALL {
            let Some(next) = pos.step(direction, grid.size()) else {
                continue;
            };
            let (passable, key_after) = match grid[next] {
                CellKind::Empty | CellKind::Goal => (true, key_held),
                CellKind::Key => (true, true),
                CellKind::Door => (key_held, key_held),
                CellKind::Wall | CellKind::Obstacle | CellKind::Agent => (false, key_held),
            };
            if passable {
                frontier.push_back((next, key_after));
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a board from rows of cell glyphs and returns it together with
    /// the start position (`@`) and the goal set (`*`).
    fn board(rows: &[&str]) -> (Grid<CellKind>, Position, HashSet<Position>) {
        let size = rows.len();
        let mut grid = Grid::new(size);
        let mut start = None;
        let mut goals = HashSet::new();
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), size, "board must be square");
            for (x, glyph) in row.chars().enumerate() {
                let pos = Position::new(x, y);
                grid[pos] = match glyph {
                    '.' => CellKind::Empty,
                    '#' => CellKind::Wall,
                    'k' => CellKind::Key,
                    'd' => CellKind::Door,
                    'm' => CellKind::Obstacle,
                    '*' => {
                        goals.insert(pos);
                        CellKind::Goal
                    }
                    '@' => {
                        start = Some(pos);
                        CellKind::Empty
                    }
                    other => panic!("unknown glyph {other:?}"),
                };
            }
        }
        (grid, start.expect("board needs a start"), goals)
    }

    #[test]
    fn open_board_is_reachable() {
        let (grid, start, goals) = board(&[
            "@...", //
            "....", //
            "....", //
            "...*",
        ]);
        assert!(is_reachable(&grid, start, &goals, false));
    }

    #[test]
    fn walls_and_obstacles_both_block() {
        let (grid, start, goals) = board(&[
            "@#.*", //
            ".#m.", //
            ".#m.", //
            ".#..",
        ]);
        assert!(!is_reachable(&grid, start, &goals, false));
    }

    #[test]
    fn key_before_door_opens_the_way() {
        let (grid, start, goals) = board(&[
            "@.k.", //
            "##d#", //
            "....", //
            "..*.",
        ]);
        assert!(is_reachable(&grid, start, &goals, false));
    }

    #[test]
    fn door_without_a_key_blocks() {
        let (grid, start, goals) = board(&[
            "@...", //
            "##d#", //
            "....", //
            "..*.",
        ]);
        assert!(!is_reachable(&grid, start, &goals, false));
        // With the key already held the same door passes.
        assert!(is_reachable(&grid, start, &goals, true));
    }

    #[test]
    fn key_behind_the_only_door_stays_locked() {
        let (grid, start, goals) = board(&[
            "@...", //
            "##d#", //
            ".k..", //
            "..*.",
        ]);
        assert!(!is_reachable(&grid, start, &goals, false));
    }

    #[test]
    fn goal_on_the_start_cell_is_immediate() {
        let (grid, start, _) = board(&[
            "@...", //
            "....", //
            "....", //
            "....",
        ]);
        let goals = HashSet::from([start]);
        assert!(is_reachable(&grid, start, &goals, false));
    }

    #[test]
    fn no_goals_means_unreachable() {
        let (grid, start, goals) = board(&[
            "@...", //
            "....", //
            "....", //
            "....",
        ]);
        assert!(goals.is_empty());
        assert!(!is_reachable(&grid, start, &goals, false));
    }
}
