use std::collections::HashSet;

use rand::Rng;

use crate::{
    Position,
    game::LevelState,
    grid::{CellKind, Grid},
    level::{LevelError, LevelSpec},
    search::is_reachable,
};

/// Random layouts rejected before falling back to the minimal board.
pub const MAX_ATTEMPTS: usize = 100;

/// Builds a playable level for a 1-based level number.
///
/// Draws random layouts until one passes the reachability pre-check, then
/// assembles the initial [`LevelState`]. The pre-check runs with no key in
/// hand and treats obstacles as walls: obstacle motion only starts once the
/// level is live, so the static puzzle must stand on its own. If no layout
/// within [`MAX_ATTEMPTS`] passes, a minimal guaranteed-solvable board is
/// returned instead; the player is never handed an unsolvable puzzle.
///
/// Errors only when `level_number` falls outside the level table.
pub fn generate(level_number: u32, rng: &mut impl Rng) -> Result<LevelState, LevelError> {
    let spec = LevelSpec::for_level(level_number)?;
    for _ in 0..MAX_ATTEMPTS {
        if let Some(state) = try_random_layout(level_number, spec, rng) {
            return Ok(state);
        }
    }
    Ok(fallback_layout(level_number, spec))
}

fn random_cell(size: usize, rng: &mut impl Rng) -> Position {
    Position::new(rng.random_range(0..size), rng.random_range(0..size))
}

/// Rejection-samples an empty cell. Entity counts are small relative to
/// the board, so the retry loop stays short in practice.
fn random_empty_cell(grid: &Grid<CellKind>, rng: &mut impl Rng) -> Position {
    loop {
        let pos = random_cell(grid.size(), rng);
        if grid[pos] == CellKind::Empty {
            return pos;
        }
    }
}

/// Places `count` cells of `kind` on empty cells, returning where they went.
fn place(
    grid: &mut Grid<CellKind>,
    kind: CellKind,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Position> {
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = random_empty_cell(grid, rng);
        grid[pos] = kind;
        placed.push(pos);
    }
    placed
}

fn try_random_layout(
    level_number: u32,
    spec: &LevelSpec,
    rng: &mut impl Rng,
) -> Option<LevelState> {
    let mut grid = Grid::new(spec.size);

    let agent_position = random_cell(spec.size, rng);
    grid[agent_position] = CellKind::Agent;

    // Earlier placements constrain later ones; no kind overwrites another.
    let goal_positions: HashSet<Position> = place(&mut grid, CellKind::Goal, spec.goal_count, rng)
        .into_iter()
        .collect();
    let key_positions: HashSet<Position> = place(&mut grid, CellKind::Key, spec.key_count, rng)
        .into_iter()
        .collect();
    let door_positions: HashSet<Position> = place(&mut grid, CellKind::Door, spec.door_count, rng)
        .into_iter()
        .collect();
    place(&mut grid, CellKind::Wall, spec.wall_count, rng);
    let obstacle_positions = place(&mut grid, CellKind::Obstacle, spec.obstacle_count, rng);

    // The agent's own cell is entered terrain, not an obstacle, so the
    // search runs on a scratch board with that cell cleared.
    let mut scratch = grid.clone();
    scratch[agent_position] = CellKind::Empty;
    if !is_reachable(&scratch, agent_position, &goal_positions, false) {
        return None;
    }

    Some(LevelState {
        grid,
        agent_position,
        goal_positions,
        key_positions,
        door_positions,
        obstacle_positions,
        has_key: false,
        moves_used: 0,
        move_budget: spec.move_budget,
        level_number,
        won: false,
        lost: false,
    })
}

/// Minimal deterministic board: agent in one corner, a single goal in the
/// opposite corner, requested entity counts ignored.
fn fallback_layout(level_number: u32, spec: &LevelSpec) -> LevelState {
    let mut grid = Grid::new(spec.size);
    let agent_position = Position::new(0, 0);
    let goal = Position::new(spec.size - 1, spec.size - 1);
    grid[agent_position] = CellKind::Agent;
    grid[goal] = CellKind::Goal;

    LevelState {
        grid,
        agent_position,
        goal_positions: HashSet::from([goal]),
        key_positions: HashSet::new(),
        door_positions: HashSet::new(),
        obstacle_positions: Vec::new(),
        has_key: false,
        moves_used: 0,
        move_budget: spec.move_budget,
        level_number,
        won: false,
        lost: false,
    }
}
