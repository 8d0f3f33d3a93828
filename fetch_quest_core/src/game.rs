use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Direction, Position,
    generate::generate,
    grid::{CellKind, Grid},
    level::{FIRST_ROAMING_LEVEL, LevelError},
};

/// What a single move attempt did. Rejected moves leave the state
/// bit-identical, so callers can also detect them by comparing
/// `moves_used` before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The agent stepped onto the target cell.
    Moved,
    /// Out of bounds, wall, obstacle, locked door, or the game is over.
    Blocked,
    /// The move consumed the last goal.
    Won,
    /// The move exhausted the budget with goals remaining.
    Lost,
}

/// The live state of one level.
///
/// Produced by the generator and thereafter mutated only through
/// [`apply_move`](LevelState::apply_move) and
/// [`scatter_obstacles`](LevelState::scatter_obstacles). The grid is the
/// source of truth for cell contents; the position sets are a cached view
/// of it, and every mutation path updates both together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub grid: Grid<CellKind>,
    pub agent_position: Position,
    pub goal_positions: HashSet<Position>,
    pub key_positions: HashSet<Position>,
    pub door_positions: HashSet<Position>,
    pub obstacle_positions: Vec<Position>,
    pub has_key: bool,
    pub moves_used: u32,
    pub move_budget: u32,
    pub level_number: u32,
    pub won: bool,
    pub lost: bool,
}

impl LevelState {
    /// True once the level has been won or lost. Terminal states absorb
    /// all further moves and ticks.
    pub fn is_over(&self) -> bool {
        self.won || self.lost
    }

    /// Attempts one cardinal move. Total: illegal moves are no-ops.
    ///
    /// A proceeding move vacates the old agent cell, consumes a key or
    /// goal on the target cell, advances the move counter, and recomputes
    /// the win/loss flags. Doors open only while a key is held; walls,
    /// obstacles, and the board edge block.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.is_over() {
            return MoveOutcome::Blocked;
        }
        let Some(target) = self.agent_position.step(direction, self.grid.size()) else {
            return MoveOutcome::Blocked;
        };
        let target_kind = self.grid[target];
        match target_kind {
            CellKind::Wall | CellKind::Obstacle => return MoveOutcome::Blocked,
            CellKind::Door if !self.has_key => return MoveOutcome::Blocked,
            _ => {}
        }

        self.grid[self.agent_position] = CellKind::Empty;
        match target_kind {
            CellKind::Key => {
                self.has_key = true;
                self.key_positions.remove(&target);
            }
            CellKind::Goal => {
                self.goal_positions.remove(&target);
            }
            CellKind::Door => {
                // An opened door is consumed; the cell becomes plain floor
                // once the agent leaves it.
                self.door_positions.remove(&target);
            }
            _ => {}
        }
        self.grid[target] = CellKind::Agent;
        self.agent_position = target;
        self.moves_used += 1;

        self.won = self.goal_positions.is_empty();
        self.lost = !self.won && self.moves_used >= self.move_budget;
        if self.won {
            MoveOutcome::Won
        } else if self.lost {
            MoveOutcome::Lost
        } else {
            MoveOutcome::Moved
        }
    }

    /// Relocates each obstacle to a random empty neighbor cell.
    ///
    /// The batch moves simultaneously: candidate cells are drawn from the
    /// pre-tick board, so a cell vacated this tick is not a target for
    /// another obstacle, and when two obstacles draw the same cell the
    /// first keeps it and the other stays put. An obstacle with no empty
    /// neighbor does not move. No-op in terminal states and on tiers whose
    /// obstacles are static. Never touches the move counter, the key flag,
    /// or the goal set, and never lands on the agent's cell (it is never
    /// empty).
    pub fn scatter_obstacles(&mut self, rng: &mut impl Rng) {
        if self.is_over() || self.level_number < FIRST_ROAMING_LEVEL {
            return;
        }

        let before = self.grid.clone();
        let mut planned: Vec<(usize, Position)> = Vec::new();
        for (index, &pos) in self.obstacle_positions.iter().enumerate() {
            let open: Vec<Position> = Direction::ALL
                .iter()
                .filter_map(|&direction| pos.step(direction, before.size()))
                .filter(|&neighbor| before[neighbor] == CellKind::Empty)
                .collect();
            if open.is_empty() {
                continue;
            }
            planned.push((index, open[rng.random_range(0..open.len())]));
        }

        for (index, target) in planned {
            if self.grid[target] != CellKind::Empty {
                continue; // contested cell, first mover kept it
            }
            let old = self.obstacle_positions[index];
            self.grid[old] = CellKind::Empty;
            self.grid[target] = CellKind::Obstacle;
            self.obstacle_positions[index] = target;
        }
    }

    /// Goals still on the board.
    pub fn goals_remaining(&self) -> usize {
        self.goal_positions.len()
    }
}

/// Owns the current level and the RNG that feeds generation and obstacle
/// motion, so whole runs replay from a single seed.
#[derive(Debug)]
pub struct Game {
    state: LevelState,
    rng: StdRng,
}

impl Game {
    /// Starts a game at the given level with a seeded RNG.
    pub fn from_level(level_number: u32, seed: u64) -> Result<Self, LevelError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = generate(level_number, &mut rng)?;
        Ok(Game { state, rng })
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        self.state.apply_move(direction)
    }

    pub fn tick_obstacles(&mut self) {
        self.state.scatter_obstacles(&mut self.rng);
    }

    /// Regenerates at the next tier, discarding the old state wholesale.
    /// Returns `false` (and changes nothing) at the last tier.
    pub fn next_level(&mut self) -> bool {
        match generate(self.state.level_number + 1, &mut self.rng) {
            Ok(state) => {
                self.state = state;
                true
            }
            Err(LevelError::UnknownLevel { .. }) => false,
        }
    }

    /// Regenerates the current tier with fresh randomness. The prior
    /// layout is not reused.
    pub fn restart_level(&mut self) {
        if let Ok(state) = generate(self.state.level_number, &mut self.rng) {
            self.state = state;
        }
    }
}
