use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use labyrinth::{Cell, Game, Pos};
use rand::Rng;
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Exit,
    Wall,
    Open,
}

#[derive(Clone, Copy, PartialEq)]
struct Tile {
    glyph: Glyph,
    color: Color,
}

/// Redraws only the tiles that changed since the previous frame.
pub struct Renderer {
    last: Vec<Tile>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }

    /// Forces a full repaint, e.g. after the maze was rebuilt.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render<R: Rng>(&mut self, stdout: &mut Stdout, game: &Game<R>, status: &str) -> io::Result<()> {
        let grid = game.grid();
        let (width, height) = (grid.cols(), grid.rows());
        if self.last.len() != width * height {
            self.last = vec![tile_for(Cell::Wall); width * height];
            self.needs_full = true;
        }

        let (term_w, term_h) = terminal::size()?;
        let Some((origin_x, origin_y)) = layout(width, height, term_w, term_h) else {
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                width.saturating_mul(CELL_W),
                height.saturating_add(2),
                term_w,
                term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        };

        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = format!(
            "Level: {}  {}  (arrows/hjkl/wasd move, r new maze, q quit)",
            game.level(),
            status
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let player = game.position();
        let exit = grid.exit();
        for y in 0..height {
            for x in 0..width {
                let pos = Pos::new(x, y);
                let tile = if pos == player {
                    Tile {
                        glyph: Glyph::Player,
                        color: Color::Red,
                    }
                } else if pos == exit {
                    Tile {
                        glyph: Glyph::Exit,
                        color: Color::Green,
                    }
                } else {
                    tile_for(grid.get(pos).unwrap_or(Cell::Wall))
                };
                let idx = y * width + x;
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(stdout, x, y, tile)?;
                }
            }
        }
        self.needs_full = false;

        stdout.flush()
    }

    fn draw_tile(&self, stdout: &mut Stdout, x: usize, y: usize, tile: Tile) -> io::Result<()> {
        let text = match tile.glyph {
            Glyph::Player => "●",
            Glyph::Exit => "▒▒",
            Glyph::Wall => "██",
            Glyph::Open => "  ",
        };
        // `layout` only succeeds when the whole maze fits on screen.
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(tile.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        for _ in w..CELL_W {
            stdout.queue(Print(' '))?;
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

/// Top-left corner that centres a `width` x `height` maze plus its HUD line,
/// or `None` if it does not fit the terminal.
fn layout(width: usize, height: usize, term_w: u16, term_h: u16) -> Option<(u16, u16)> {
    let needed_w = width.checked_mul(CELL_W).and_then(|w| u16::try_from(w).ok())?;
    let needed_h = height.checked_add(2).and_then(|h| u16::try_from(h).ok())?;
    if term_w < needed_w || term_h < needed_h {
        return None;
    }
    Some(((term_w - needed_w) / 2, (term_h - needed_h) / 2 + 1))
}

fn tile_for(cell: Cell) -> Tile {
    match cell {
        Cell::Wall => Tile {
            glyph: Glyph::Wall,
            color: Color::DarkBlue,
        },
        Cell::Open => Tile {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
    }
}
