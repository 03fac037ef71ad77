//! Terminal presentation. Reads a [`SimulationState`] snapshot and redraws
//! only the cells that changed since the previous frame.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::components::{Position, Rgb};
use crate::game::SimulationState;
use crate::level::{GridMap, Tile};

/// Terminal columns per maze tile.
pub const CELL_W: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Ghost,
    Frightened,
    Wall,
    Empty,
    Pellet,
    Power,
    Gate,
}

impl Glyph {
    /// Declaration order, so `glyph as usize` indexes it.
    const ALL: [Glyph; 8] = [
        Glyph::Player,
        Glyph::Ghost,
        Glyph::Frightened,
        Glyph::Wall,
        Glyph::Empty,
        Glyph::Pellet,
        Glyph::Power,
        Glyph::Gate,
    ];

    /// Spaces needed after the glyph to fill a whole cell.
    fn padding(self) -> usize {
        CELL_W.saturating_sub(UnicodeWidthStr::width(self.text()))
    }

    fn text(self) -> &'static str {
        match self {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Pellet => "· ",
            Glyph::Power => "● ",
            Glyph::Gate => "==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: Glyph,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        glyph: Glyph::Empty,
        color: Color::Reset,
    };
}

/// What was drawn last frame, so the next one can skip unchanged cells.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_banner: String,
    padding: [usize; Glyph::ALL.len()],
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            last: vec![Cell::BLANK; width * height],
            last_hud: String::new(),
            last_banner: String::new(),
            padding: Glyph::ALL.map(Glyph::padding),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces a full redraw on the next frame.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }
}

fn to_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Tile an actor is drawn on: nearest tile, column wrapped, row clamped.
fn actor_tile(grid: &GridMap, pos: Position) -> (usize, usize) {
    let (x, y) = pos.tile();
    let x = x.rem_euclid(grid.width() as i64) as usize;
    let y = y.clamp(0, grid.height() as i64 - 1) as usize;
    (x, y)
}

/// Player over ghosts over the maze itself.
pub fn cell_for(state: &SimulationState, x: usize, y: usize) -> Cell {
    if actor_tile(&state.grid, state.player.pos()) == (x, y) {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = state
        .ghosts
        .iter()
        .find(|g| actor_tile(&state.grid, g.pos()) == (x, y))
    {
        if ghost.is_frightened() {
            return Cell {
                glyph: Glyph::Frightened,
                color: Color::Blue,
            };
        }
        return Cell {
            glyph: Glyph::Ghost,
            color: to_color(ghost.color()),
        };
    }
    match state.grid.tile(x as i64, y as i64) {
        Some(Tile::Wall) => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Some(Tile::Gate) => Cell {
            glyph: Glyph::Gate,
            color: Color::Cyan,
        },
        Some(Tile::Pellet) => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Some(Tile::PowerPellet) => Cell {
            glyph: Glyph::Power,
            color: Color::Magenta,
        },
        Some(Tile::Empty) | None => Cell::BLANK,
    }
}

fn hud_line(state: &SimulationState) -> String {
    let s = state.status;
    format!(
        "Score: {}  Lives: {}  Level: {}  Pellets: {}  (p pause, r restart, n new, q quit)",
        s.score, s.lives, s.level, s.pellets_remaining
    )
}

fn banner(state: &SimulationState) -> String {
    let s = state.status;
    if s.win {
        format!("YOU WIN - Score: {} (r to restart, n for a new game)", s.score)
    } else if s.game_over {
        format!("GAME OVER - Final Score: {} (n for a new game, q to quit)", s.score)
    } else if s.paused {
        "PAUSED (p to resume)".to_string()
    } else {
        String::new()
    }
}

/// Draws one frame into `out` for a terminal of `term_size` (cols, rows).
pub fn render<W: Write>(
    out: &mut W,
    state: &SimulationState,
    renderer: &mut Renderer,
    term_size: (u16, u16),
) -> io::Result<()> {
    let (width, height) = (state.grid.width(), state.grid.height());
    let needed_h = (height + 2) as u16;
    let needed_w = (width * CELL_W) as u16;
    let (term_w, term_h) = term_size;

    out.queue(MoveTo(0, 0))?;
    if term_w < needed_w || term_h < needed_h {
        out.queue(Clear(ClearType::All))?;
        out.queue(Print(format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        )))?;
        out.flush()?;
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
    if renderer.last.len() != width * height {
        renderer.last = vec![Cell::BLANK; width * height];
        renderer.needs_full = true;
    }
    if renderer.needs_full {
        out.queue(Clear(ClearType::All))?;
    }

    let hud = hud_line(state);
    if renderer.needs_full || hud != renderer.last_hud {
        out.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        out.queue(SetForegroundColor(Color::White))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(Print(&hud))?;
        out.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for y in 0..height {
        for x in 0..width {
            let cell = cell_for(state, x, y);
            let idx = y * width + x;
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(out, renderer, x, y, cell)?;
            }
        }
    }

    let banner = banner(state);
    if renderer.needs_full || banner != renderer.last_banner {
        out.queue(MoveTo(renderer.origin_x, renderer.origin_y + height as u16))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&banner))?;
        out.queue(ResetColor)?;
        renderer.last_banner = banner;
    }
    renderer.needs_full = false;

    out.flush()
}

fn draw_cell<W: Write>(out: &mut W, renderer: &Renderer, x: usize, y: usize, cell: Cell) -> io::Result<()> {
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    out.queue(MoveTo(x_pos, y_pos))?;
    out.queue(SetForegroundColor(cell.color))?;
    out.queue(Print(cell.glyph.text()))?;
    for _ in 0..renderer.padding[cell.glyph as usize] {
        out.queue(Print(' '))?;
    }
    out.queue(ResetColor)?;
    Ok(())
}
