use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use std::io::{self, Stdout};
use std::thread;
use std::time::{Duration, Instant};

mod game;
mod level;
mod maze;
mod render;

use game::{tick, Game, TickOutcome};
use maze::Dir;
use render::Renderer;

const DEFAULT_TICK_MS: u64 = 120;
const DEFAULT_RENDER_FPS: u64 = 60;
const INPUT_HOLD_MS: u64 = 160;

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> io::Result<()> {
    let mut rng = rand::thread_rng();
    let mut game = Game::new(&mut rng);
    let mut renderer = Renderer::new();
    let mut last_seen: [Option<Instant>; 4] = [None, None, None, None];
    let (tick_ms, render_fps) = read_speed_settings();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Up | KeyCode::Char('k') => {
                            last_seen[idx_for_dir(Dir::Up)] = Some(Instant::now());
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            last_seen[idx_for_dir(Dir::Down)] = Some(Instant::now());
                        }
                        KeyCode::Left | KeyCode::Char('h') => {
                            last_seen[idx_for_dir(Dir::Left)] = Some(Instant::now());
                        }
                        KeyCode::Right | KeyCode::Char('l') => {
                            last_seen[idx_for_dir(Dir::Right)] = Some(Instant::now());
                        }
                        _ => {}
                    },
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            let dt = last_tick.elapsed();
            last_tick = Instant::now();
            let held = held_dirs(&last_seen);
            match tick(&mut game, &mut rng, &held, dt) {
                TickOutcome::GameOver => {
                    render::render(stdout, &game, &mut renderer)?;
                    render::draw_game_over(stdout, &game)?;
                    return wait_for_quit();
                }
                TickOutcome::LevelComplete => {
                    renderer.flash(format!("Welcome to level {}!", game.level));
                }
                TickOutcome::Playing => {}
            }
        }
        render::render(stdout, &game, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn wait_for_quit() -> io::Result<()> {
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

fn read_speed_settings() -> (u64, u64) {
    let tick_ms = std::env::var("MAZE_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (tick_ms, render_fps)
}

fn held_dirs(last_seen: &[Option<Instant>; 4]) -> Vec<Dir> {
    let now = Instant::now();
    let mut held = Vec::new();
    for dir in Dir::ALL {
        if let Some(t) = last_seen[idx_for_dir(dir)] {
            if now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS) {
                held.push(dir);
            }
        }
    }
    held
}

fn idx_for_dir(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
