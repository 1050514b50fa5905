use rand::Rng;

use crate::maze::{Pos, GRID_EXTENT, MIN_EXTENT};

pub const BASE_SIZE: usize = 20;
pub const SIZE_INCREMENT: usize = 5;
pub const GOAL_STEP: usize = 3;

pub struct LevelParams {
    pub level: u32,
    pub extent: usize,
    pub start: Pos,
    pub goal: Pos,
}

impl LevelParams {
    pub fn for_level(level: u32, rng: &mut impl Rng) -> Self {
        let extent = extent_for(level);
        assert!(
            extent >= MIN_EXTENT,
            "level {} gives extent {}, below the viable minimum {}",
            level,
            extent,
            MIN_EXTENT
        );

        let start = Pos { x: 1, y: 1 };
        let mut goal = if level % 10 == 0 {
            // Every tenth level the door moves somewhere new.
            Pos {
                x: rng.gen_range(2..=extent - 2),
                y: rng.gen_range(2..=extent - 2),
            }
        } else {
            deterministic_goal(level, extent, start)
        };

        if goal.x <= start.x {
            goal.x = start.x + 2;
        }
        if goal.y <= start.y {
            goal.y = start.y + 2;
        }

        LevelParams {
            level,
            extent,
            start,
            goal,
        }
    }
}

pub fn extent_for(level: u32) -> usize {
    (BASE_SIZE + level as usize * SIZE_INCREMENT).min(GRID_EXTENT)
}

fn deterministic_goal(level: u32, extent: usize, start: Pos) -> Pos {
    Pos {
        x: (start.x + level as usize * GOAL_STEP).min(extent - 2),
        y: (start.y + level as usize * GOAL_STEP).min(extent - 2),
    }
}
