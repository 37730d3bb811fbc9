use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use pacman_ghosts::components::{cell_of, Colour, GridPos, Tile};
use pacman_ghosts::{Game, GameStatus, GhostStateId};

const CELL_W: usize = 2;
/// HUD above the board, then the ghost legend and end banner below it.
const CHROME_ROWS: u16 = 3;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Pellet,
    Power,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

/// Redraws only the board cells that changed since the last frame.
pub struct Renderer {
    last: Vec<Cell>,
    last_hud: String,
    last_legend: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    width: usize,
    height: usize,
    debug: bool,
}

impl Renderer {
    pub fn new(width: usize, height: usize, debug: bool) -> Self {
        Self {
            last: vec![
                Cell {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                width * height
            ],
            last_hud: String::new(),
            last_legend: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            width,
            height,
            debug,
        }
    }

    fn legend_row(&self) -> u16 {
        self.origin_y + self.height as u16
    }

    fn banner_row(&self) -> u16 {
        self.legend_row() + 1
    }

    fn needed(&self) -> (u16, u16) {
        ((self.width * CELL_W) as u16, self.height as u16 + CHROME_ROWS)
    }

    pub fn render(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let (needed_w, needed_h) = self.needed();
        stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = format!(
            "Score: {}  Lives: {}  Mode: {:?}  Pellets: {}  Power: {:.1}  (q to quit)",
            game.score(),
            game.lives(),
            game.mode(),
            game.board().pellets_left(),
            game.power_remaining(),
        );
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let cell = cell_for(game, GridPos::new(x as i32, y as i32));
                let idx = y * self.width + x;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, x, y, cell)?;
                }
            }
        }

        if self.debug {
            self.draw_legend(stdout, game)?;
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    /// One line per ghost with its live state name, in the ghost's colour.
    fn draw_legend(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let legend: String = game
            .ghosts()
            .iter()
            .map(|g| format!("{:?}:{} ", g.kind(), g.state_name()))
            .collect();
        if !self.needs_full && legend == self.last_legend {
            return Ok(());
        }
        stdout.queue(MoveTo(self.origin_x, self.legend_row()))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        for ghost in game.ghosts() {
            let sprite = ghost.sprite();
            stdout.queue(SetForegroundColor(to_color(sprite.colour)))?;
            stdout.queue(Print(format!("{:?}:{} ", sprite.kind, sprite.state_name)))?;
        }
        stdout.queue(ResetColor)?;
        self.last_legend = legend;
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Eyes => "👀",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Pellet => "· ",
            Glyph::Power => "● ",
        };
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(cell.color))?;
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

    /// Final banner under the board; the caller waits for `q`.
    pub fn render_end(&self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let (needed_w, needed_h) = self.needed();
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(MoveTo(0, needed_h))?;
        } else {
            stdout.queue(MoveTo(self.origin_x, self.banner_row()))?;
        }
        stdout.queue(Clear(ClearType::CurrentLine))?;
        let headline = match game.status() {
            GameStatus::Won => "YOU WIN",
            _ => "GAME OVER",
        };
        stdout.queue(Print(format!(
            "{headline} - Final Score: {} (press q to quit)",
            game.score()
        )))?;
        stdout.flush()
    }
}

fn cell_for(game: &Game, pos: GridPos) -> Cell {
    if cell_of(game.pacman().pos()) == pos {
        return Cell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    if let Some(ghost) = game.ghosts().iter().find(|g| cell_of(g.body().pos) == pos) {
        let glyph = match ghost.state() {
            GhostStateId::Frightened => Glyph::Frightened,
            GhostStateId::Eaten => Glyph::Eyes,
            _ => Glyph::Ghost,
        };
        return Cell {
            glyph,
            color: to_color(ghost.body().colour),
        };
    }
    match game.board().tile(pos) {
        Tile::Wall => Cell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Empty => Cell {
            glyph: Glyph::Empty,
            color: Color::Reset,
        },
        Tile::Pellet => Cell {
            glyph: Glyph::Pellet,
            color: Color::White,
        },
        Tile::PowerUp => Cell {
            glyph: Glyph::Power,
            color: Color::Magenta,
        },
    }
}

fn to_color(colour: Colour) -> Color {
    match colour {
        Colour::Red => Color::Red,
        Colour::Magenta => Color::Magenta,
        Colour::Cyan => Color::Cyan,
        Colour::Orange => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        Colour::Blue => Color::Blue,
        Colour::White => Color::White,
        Colour::Yellow => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_and_banner_get_their_own_rows() {
        let renderer = Renderer::new(28, 31, true);
        let (_, needed_h) = renderer.needed();
        let hud_row = renderer.origin_y - 1;
        assert_eq!(renderer.legend_row(), renderer.origin_y + 31);
        assert_eq!(renderer.banner_row(), renderer.legend_row() + 1);
        // every row, HUD through banner, fits in what we ask the terminal for
        assert_eq!(renderer.banner_row() - hud_row + 1, needed_h);
    }
}
