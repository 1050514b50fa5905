use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use crate::game::Game;
use crate::maze::{Pos, Tile, GRID_EXTENT};

pub const CELL_W: usize = 2;
const NOTICE_FRAMES: u32 = 40;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Door,
    Wall,
    Floor,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    notice: Option<(String, u32)>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Floor,
                    color: Color::Reset,
                };
                GRID_EXTENT * GRID_EXTENT
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            notice: None,
        }
    }

    pub fn flash(&mut self, message: String) {
        self.notice = Some((message, NOTICE_FRAMES));
    }
}

pub fn render(stdout: &mut Stdout, game: &Game, renderer: &mut Renderer) -> io::Result<()> {
    let needed_h = (GRID_EXTENT + 2) as u16;
    let needed_w = (GRID_EXTENT * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let mut hud = format!(
        "Level: {}  Time: {}s  (q to quit)",
        game.level,
        game.remaining().as_secs()
    );
    if let Some((message, frames_left)) = renderer.notice.take() {
        hud.push_str("  ");
        hud.push_str(&message);
        if frames_left > 1 {
            renderer.notice = Some((message, frames_left - 1));
        }
    }
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..GRID_EXTENT {
        for x in 0..GRID_EXTENT {
            let pos = Pos { x, y };
            let cell = cell_for(game, pos);
            let idx = y * GRID_EXTENT + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, pos: Pos) -> Cell {
    if pos == game.player {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if pos == game.maze.goal {
        return Cell {
            glyph: Glyph::Door,
            color: Color::Magenta,
        };
    }
    match game.maze.grid[pos.y][pos.x] {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Open => Cell {
            glyph: Glyph::Floor,
            color: Color::Reset,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Player => ("😃", cell.color),
        Glyph::Door => ("🚪", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Floor => ("  ", cell.color),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

pub fn draw_game_over(stdout: &mut Stdout, game: &Game) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    let needed_h = (GRID_EXTENT + 2) as u16;
    let needed_w = (GRID_EXTENT * CELL_W) as u16;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + GRID_EXTENT as u16))?;
    }
    stdout.queue(Print(format!(
        "Game Over! Time's up! You made it to level {} (press q to quit)",
        game.level
    )))?;
    stdout.flush()?;
    Ok(())
}
