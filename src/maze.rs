use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;

pub const GRID_EXTENT: usize = 25;
pub const MIN_EXTENT: usize = 5;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Tile {
    Open,
    Wall,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

pub struct Maze {
    pub extent: usize,
    pub grid: Vec<Vec<Tile>>,
    pub start: Pos,
    pub goal: Pos,
}

impl Maze {
    pub fn generate(extent: usize, start: Pos, goal: Pos, rng: &mut impl Rng) -> Self {
        let mut grid = vec![vec![Tile::Wall; GRID_EXTENT]; GRID_EXTENT];
        carve(&mut grid, extent, start, rng);
        open_goal(&mut grid, goal);
        Maze {
            extent,
            grid,
            start,
            goal,
        }
    }

    pub fn is_walkable(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let x = x as usize;
        let y = y as usize;
        x < GRID_EXTENT && y < GRID_EXTENT && self.grid[y][x] == Tile::Open
    }
}

fn carve(grid: &mut [Vec<Tile>], extent: usize, start: Pos, rng: &mut impl Rng) {
    grid[start.y][start.x] = Tile::Open;
    let mut stack = vec![start];

    while let Some(&cell) = stack.last() {
        let mut unvisited = Vec::new();
        for dir in Dir::ALL {
            let (dx, dy) = dir.delta();
            let nx = cell.x as isize + dx * 2;
            let ny = cell.y as isize + dy * 2;
            if nx > 0
                && ny > 0
                && nx < extent as isize - 1
                && ny < extent as isize - 1
                && grid[ny as usize][nx as usize] == Tile::Wall
            {
                unvisited.push(dir);
            }
        }

        match unvisited.choose(rng) {
            Some(&dir) => {
                let (dx, dy) = dir.delta();
                let mid_x = (cell.x as isize + dx) as usize;
                let mid_y = (cell.y as isize + dy) as usize;
                let next_x = (cell.x as isize + dx * 2) as usize;
                let next_y = (cell.y as isize + dy * 2) as usize;
                grid[mid_y][mid_x] = Tile::Open;
                grid[next_y][next_x] = Tile::Open;
                stack.push(Pos {
                    x: next_x,
                    y: next_y,
                });
            }
            None => {
                stack.pop();
            }
        }
    }
}

fn open_goal(grid: &mut [Vec<Tile>], goal: Pos) {
    if grid[goal.y][goal.x] == Tile::Open {
        return;
    }
    grid[goal.y][goal.x] = Tile::Open;
    connect_goal(grid, goal);
}

// The goal may land on an even coordinate the lattice carve never visits.
// Punch the shortest corridor from the goal to the nearest carved cell so
// the door is always reachable.
fn connect_goal(grid: &mut [Vec<Tile>], goal: Pos) {
    let mut visited = vec![vec![false; GRID_EXTENT]; GRID_EXTENT];
    let mut prev: Vec<Vec<Option<Pos>>> = vec![vec![None; GRID_EXTENT]; GRID_EXTENT];
    let mut queue = VecDeque::new();
    visited[goal.y][goal.x] = true;
    queue.push_back(goal);

    let mut nearest = None;
    while let Some(pos) = queue.pop_front() {
        if grid[pos.y][pos.x] == Tile::Open && pos != goal {
            nearest = Some(pos);
            break;
        }
        for dir in Dir::ALL {
            let (dx, dy) = dir.delta();
            let nx = pos.x as isize + dx;
            let ny = pos.y as isize + dy;
            if nx < 0 || ny < 0 || nx >= GRID_EXTENT as isize || ny >= GRID_EXTENT as isize {
                continue;
            }
            let nx = nx as usize;
            let ny = ny as usize;
            if visited[ny][nx] {
                continue;
            }
            visited[ny][nx] = true;
            prev[ny][nx] = Some(pos);
            queue.push_back(Pos { x: nx, y: ny });
        }
    }

    let Some(mut current) = nearest else {
        return;
    };
    while current != goal {
        grid[current.y][current.x] = Tile::Open;
        current = prev[current.y][current.x].expect("trace leads back to goal");
    }
}
