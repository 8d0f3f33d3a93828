use serde::Serialize;

/// Errors raised when looking up the fixed level table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("level {requested} is out of range (valid levels are 1..={max})")]
    UnknownLevel { requested: u32, max: u32 },
}

/// Per-tier configuration. Entity counts are applied in placement order
/// (goals, keys, doors, walls, obstacles) during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelSpec {
    pub name: &'static str,
    pub size: usize,
    pub wall_count: usize,
    pub goal_count: usize,
    pub key_count: usize,
    pub door_count: usize,
    pub obstacle_count: usize,
    pub move_budget: u32,
}

/// The fixed level table, ordered easiest to hardest.
pub const LEVELS: [LevelSpec; 5] = [
    LevelSpec {
        name: "Tutorial",
        size: 4,
        wall_count: 0,
        goal_count: 1,
        key_count: 0,
        door_count: 0,
        obstacle_count: 0,
        move_budget: 5,
    },
    LevelSpec {
        name: "Easy",
        size: 5,
        wall_count: 3,
        goal_count: 1,
        key_count: 0,
        door_count: 0,
        obstacle_count: 0,
        move_budget: 8,
    },
    LevelSpec {
        name: "Medium",
        size: 6,
        wall_count: 5,
        goal_count: 2,
        key_count: 1,
        door_count: 1,
        obstacle_count: 0,
        move_budget: 12,
    },
    LevelSpec {
        name: "Hard",
        size: 7,
        wall_count: 8,
        goal_count: 2,
        key_count: 1,
        door_count: 2,
        obstacle_count: 1,
        move_budget: 15,
    },
    LevelSpec {
        name: "Expert",
        size: 8,
        wall_count: 12,
        goal_count: 3,
        key_count: 2,
        door_count: 3,
        obstacle_count: 2,
        move_budget: 20,
    },
];

/// Highest playable level number.
pub const MAX_LEVEL: u32 = LEVELS.len() as u32;

/// First tier whose obstacles relocate on the periodic tick.
pub const FIRST_ROAMING_LEVEL: u32 = 4;

/// Obstacle relocation period, in scheduler time units. The reference
/// front end interprets one unit as one second.
pub const OBSTACLE_TICK_PERIOD: u64 = 3;

impl LevelSpec {
    /// Looks up the spec for a 1-based level number.
    pub fn for_level(level_number: u32) -> Result<&'static LevelSpec, LevelError> {
        if level_number == 0 || level_number > MAX_LEVEL {
            return Err(LevelError::UnknownLevel {
                requested: level_number,
                max: MAX_LEVEL,
            });
        }
        Ok(&LEVELS[(level_number - 1) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_covers_exactly_the_table() {
        assert_eq!(LevelSpec::for_level(1), Ok(&LEVELS[0]));
        assert_eq!(LevelSpec::for_level(5), Ok(&LEVELS[4]));
        assert_eq!(
            LevelSpec::for_level(0),
            Err(LevelError::UnknownLevel {
                requested: 0,
                max: 5
            })
        );
        assert_eq!(
            LevelSpec::for_level(6),
            Err(LevelError::UnknownLevel {
                requested: 6,
                max: 5
            })
        );
    }

    #[test]
    fn every_tier_fits_its_board() {
        for spec in &LEVELS {
            assert!((4..=8).contains(&spec.size), "{} board size", spec.name);
            assert!(spec.goal_count >= 1, "{} needs a goal", spec.name);
            assert!(spec.move_budget > 0, "{} needs a budget", spec.name);
            // One cell stays reserved for the agent.
            let occupied = spec.wall_count
                + spec.goal_count
                + spec.key_count
                + spec.door_count
                + spec.obstacle_count;
            assert!(occupied < spec.size * spec.size, "{} overfills", spec.name);
        }
    }

    #[test]
    fn obstacles_roam_only_on_upper_tiers() {
        for (index, spec) in LEVELS.iter().enumerate() {
            let level_number = index as u32 + 1;
            if level_number < FIRST_ROAMING_LEVEL {
                assert_eq!(spec.obstacle_count, 0, "{} should be static", spec.name);
            } else {
                assert!(spec.obstacle_count > 0, "{} should roam", spec.name);
            }
        }
    }
}
