use std::time::Duration;

use rand::Rng;

use crate::level::LevelParams;
use crate::maze::{Dir, Maze, Pos};

pub const TIME_LIMIT: Duration = Duration::from_secs(25);

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TickOutcome {
    Playing,
    LevelComplete,
    GameOver,
}

pub struct Game {
    pub level: u32,
    pub maze: Maze,
    pub player: Pos,
    pub elapsed: Duration,
    pub over: bool,
}

impl Game {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self::at_level(1, rng)
    }

    fn at_level(level: u32, rng: &mut impl Rng) -> Self {
        let params = LevelParams::for_level(level, rng);
        let maze = Maze::generate(params.extent, params.start, params.goal, rng);
        let player = maze.start;
        Game {
            level: params.level,
            maze,
            player,
            elapsed: Duration::ZERO,
            over: false,
        }
    }

    pub fn remaining(&self) -> Duration {
        TIME_LIMIT.saturating_sub(self.elapsed)
    }

    fn try_move(&mut self, dir: Dir) {
        let (dx, dy) = dir.delta();
        let nx = self.player.x as isize + dx;
        let ny = self.player.y as isize + dy;
        if self.maze.is_walkable(nx, ny) {
            self.player = Pos {
                x: nx as usize,
                y: ny as usize,
            };
        }
    }
}

pub fn tick(game: &mut Game, rng: &mut impl Rng, held: &[Dir], dt: Duration) -> TickOutcome {
    if game.over {
        return TickOutcome::GameOver;
    }

    game.elapsed += dt;
    if game.elapsed >= TIME_LIMIT {
        game.over = true;
        return TickOutcome::GameOver;
    }

    // Each held direction is gated on walkability separately, so holding two
    // keys can advance both axes within one tick.
    for dir in Dir::ALL {
        if held.contains(&dir) {
            game.try_move(dir);
        }
    }

    if game.player == game.maze.goal {
        *game = Game::at_level(game.level + 1, rng);
        return TickOutcome::LevelComplete;
    }

    TickOutcome::Playing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Tile, GRID_EXTENT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn walled_maze(open: &[Pos], start: Pos, goal: Pos) -> Maze {
        let mut grid = vec![vec![Tile::Wall; GRID_EXTENT]; GRID_EXTENT];
        for pos in open {
            grid[pos.y][pos.x] = Tile::Open;
        }
        Maze {
            extent: GRID_EXTENT,
            grid,
            start,
            goal,
        }
    }

    fn game_with(maze: Maze) -> Game {
        let player = maze.start;
        Game {
            level: 1,
            maze,
            player,
            elapsed: Duration::ZERO,
            over: false,
        }
    }

    #[test]
    fn move_into_wall_is_rejected() {
        let start = Pos { x: 1, y: 1 };
        let maze = walled_maze(&[start], start, Pos { x: 3, y: 3 });
        let mut game = game_with(maze);
        let mut rng = StdRng::seed_from_u64(1);

        for dir in Dir::ALL {
            let outcome = tick(&mut game, &mut rng, &[dir], Duration::from_millis(100));
            assert_eq!(outcome, TickOutcome::Playing);
            assert_eq!(game.player, start);
        }
    }

    #[test]
    fn move_into_open_cell_applies() {
        let start = Pos { x: 1, y: 1 };
        let maze = walled_maze(&[start, Pos { x: 2, y: 1 }], start, Pos { x: 3, y: 3 });
        let mut game = game_with(maze);
        let mut rng = StdRng::seed_from_u64(1);

        tick(&mut game, &mut rng, &[Dir::Right], Duration::from_millis(100));
        assert_eq!(game.player, Pos { x: 2, y: 1 });
    }

    #[test]
    fn two_held_directions_can_both_advance_in_one_tick() {
        let start = Pos { x: 1, y: 1 };
        let open = [
            start,
            Pos { x: 1, y: 2 },
            Pos { x: 2, y: 2 },
        ];
        let maze = walled_maze(&open, start, Pos { x: 5, y: 5 });
        let mut game = game_with(maze);
        let mut rng = StdRng::seed_from_u64(1);

        tick(
            &mut game,
            &mut rng,
            &[Dir::Down, Dir::Right],
            Duration::from_millis(100),
        );
        assert_eq!(game.player, Pos { x: 2, y: 2 });
    }

    #[test]
    fn reaching_the_goal_starts_a_fresh_level() {
        let mut rng = StdRng::seed_from_u64(41);
        let mut game = Game::new(&mut rng);
        game.elapsed = Duration::from_secs(20);
        game.player = game.maze.goal;

        let outcome = tick(&mut game, &mut rng, &[], Duration::from_millis(100));

        assert_eq!(outcome, TickOutcome::LevelComplete);
        assert_eq!(game.level, 2);
        assert_eq!(game.player, game.maze.start);
        assert_eq!(game.elapsed, Duration::ZERO);
        assert!(!game.over);
    }

    #[test]
    fn running_out_of_time_is_terminal() {
        let mut rng = StdRng::seed_from_u64(43);
        let mut game = Game::new(&mut rng);

        let outcome = tick(&mut game, &mut rng, &[], TIME_LIMIT);
        assert_eq!(outcome, TickOutcome::GameOver);
        assert!(game.over);

        // Input after game over must not move the player.
        let frozen = game.player;
        for _ in 0..5 {
            let outcome = tick(&mut game, &mut rng, &Dir::ALL, Duration::from_secs(1));
            assert_eq!(outcome, TickOutcome::GameOver);
            assert_eq!(game.player, frozen);
        }
        assert_eq!(game.elapsed, TIME_LIMIT);
    }

    #[test]
    fn clock_accumulates_until_the_limit() {
        let mut rng = StdRng::seed_from_u64(47);
        let mut game = Game::new(&mut rng);

        for _ in 0..3 {
            let outcome = tick(&mut game, &mut rng, &[], Duration::from_secs(1));
            assert_eq!(outcome, TickOutcome::Playing);
        }
        assert_eq!(game.elapsed, Duration::from_secs(3));
        assert_eq!(game.remaining(), Duration::from_secs(22));
    }

    #[test]
    fn every_generated_level_is_solvable() {
        use std::collections::VecDeque;

        let mut rng = StdRng::seed_from_u64(53);
        for level in 1..=12 {
            let game = Game::at_level(level, &mut rng);
            let mut seen = vec![vec![false; GRID_EXTENT]; GRID_EXTENT];
            let mut queue = VecDeque::new();
            seen[game.maze.start.y][game.maze.start.x] = true;
            queue.push_back(game.maze.start);
            let mut reached = false;

            while let Some(pos) = queue.pop_front() {
                if pos == game.maze.goal {
                    reached = true;
                    break;
                }
                for dir in Dir::ALL {
                    let (dx, dy) = dir.delta();
                    let nx = pos.x as isize + dx;
                    let ny = pos.y as isize + dy;
                    if !game.maze.is_walkable(nx, ny) {
                        continue;
                    }
                    let next = Pos {
                        x: nx as usize,
                        y: ny as usize,
                    };
                    if !seen[next.y][next.x] {
                        seen[next.y][next.x] = true;
                        queue.push_back(next);
                    }
                }
            }
            assert!(reached, "level {} goal unreachable", level);
        }
    }
}
