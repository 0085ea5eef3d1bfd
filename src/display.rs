/// Rendering layer — all terminal I/O lives here.
///
/// The simulation draws through the [`Renderer`] trait and never sees a
/// terminal.  [`TerminalRenderer`] maps the logical play area onto the
/// character grid and queues crossterm commands into any writer.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;

use crate::config::Config;
use crate::entities::EntityKind;

/// Frame sink used by the world each tick.
pub trait Renderer {
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn draw_sprite(&mut self, sprite: EntityKind, top_left: Vec2) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_SHIP: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PROJECTILE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const HINT: &str = "← → / A D : Move   SPACE : Shoot   Q : Quit";

// ── Sprites ───────────────────────────────────────────────────────────────────

fn glyphs(sprite: EntityKind) -> (&'static [&'static str], Color) {
    match sprite {
        //   ▲
        //  /█\
        EntityKind::Ship => (&[" ▲ ", "/█\\"], C_SHIP),
        //  «▼»
        //  ╚═╝
        EntityKind::Enemy => (&["«▼»", "╚═╝"], C_ENEMY),
        EntityKind::Projectile => (&["║"], C_PROJECTILE),
    }
}

// ── Terminal renderer ─────────────────────────────────────────────────────────

/// Draws inside a border: row 0 and `rows - 2` are the top and bottom bars,
/// column 0 and `cols - 1` the walls, the last row holds the controls hint.
pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    /// Logical pixels → cells.
    scale: Vec2,
    /// Hitbox size per sprite, indexed by `box_index`.
    boxes: [Vec2; 3],
}

fn box_index(sprite: EntityKind) -> usize {
    match sprite {
        EntityKind::Ship => 0,
        EntityKind::Enemy => 1,
        EntityKind::Projectile => 2,
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, config: &Config, (cols, rows): (u16, u16)) -> Self {
        let inner = Vec2::new(
            f32::from(cols.saturating_sub(2)),
            f32::from(rows.saturating_sub(3)),
        );
        Self {
            out,
            cols,
            rows,
            scale: inner / Vec2::new(config.width, config.height),
            boxes: [config.ship_size, config.enemy_size, config.projectile_size],
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Cell for a logical point, offset past the top-left border.
    fn cell(&self, point: Vec2) -> (i32, i32) {
        let scaled = (point * self.scale).floor();
        (scaled.x as i32 + 1, scaled.y as i32 + 1)
    }

    /// First cell of the glyph art, centred on the hitbox so entities that
    /// share an x share a column whatever their box width.
    fn glyph_origin(&self, sprite: EntityKind, top_left: Vec2, lines: &[&str]) -> (i32, i32) {
        let centre = top_left + self.boxes[box_index(sprite)] / 2.0;
        let (col, row) = self.cell(centre);
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        let height = lines.len() as i32;
        (col - width / 2, row - (height - 1) / 2)
    }

    fn inside(&self, col: i32, row: i32) -> bool {
        col >= 1 && row >= 1 && col < i32::from(self.cols) - 1 && row < i32::from(self.rows) - 2
    }

    fn draw_border(&mut self) -> io::Result<()> {
        let w = self.cols as usize;
        let bottom = self.rows.saturating_sub(2);

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out
            .queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

        self.out.queue(cursor::MoveTo(0, bottom))?;
        self.out
            .queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

        for row in 1..bottom {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out
                .queue(cursor::MoveTo(self.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.out.queue(style::SetBackgroundColor(color))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()
    }

    fn draw_sprite(&mut self, sprite: EntityKind, top_left: Vec2) -> io::Result<()> {
        let (lines, color) = glyphs(sprite);
        let (col, row) = self.glyph_origin(sprite, top_left, lines);

        self.out.queue(style::SetForegroundColor(color))?;
        for (dy, line) in lines.iter().enumerate() {
            let row = row + dy as i32;
            for (dx, ch) in line.chars().enumerate() {
                let col = col + dx as i32;
                if ch == ' ' || !self.inside(col, row) {
                    continue;
                }
                self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
                self.out.queue(Print(ch))?;
            }
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        let last = self.rows.saturating_sub(1);
        self.out.queue(cursor::MoveTo(1, last))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print(HINT))?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, last))?;
        self.out.flush()
    }
}
