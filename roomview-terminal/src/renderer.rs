/// Cell rasterizer: replays draw commands into a grid of terminal cells
use crossterm::{
    cursor::MoveTo,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use roomview_core::render::{LineStyle, Surface};
use roomview_core::{Color, ScreenPoint, Viewport};
use std::io::Write;

/// Virtual pixels per terminal cell. Terminal cells are about twice as tall
/// as they are wide.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// Terminal drawing surface. Coordinates passed in are virtual pixels of
/// [`CELL_WIDTH`] x [`CELL_HEIGHT`] per cell.
pub struct CellCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    ascii: bool,
}

/// Source-over blend of `src` onto an opaque `dst`.
fn blend(src: Color, dst: Color) -> Color {
    if src.a == 255 {
        return src;
    }
    let a = f64::from(src.a) / 255.0;
    let mix = |s: u8, d: u8| (f64::from(s) * a + f64::from(d) * (1.0 - a)).round() as u8;
    Color::rgb(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b))
}

fn lerp(top: Color, bottom: Color, t: f64) -> Color {
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
    Color::rgb(mix(top.r, bottom.r), mix(top.g, bottom.g), mix(top.b, bottom.b))
}

fn ramp_char(color: Color) -> char {
    let index = (color.luminance() * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Character approximating a line's direction in cell space.
fn line_char(dx: f64, dy: f64) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ax > 2.0 * ay {
        '-'
    } else if ay > 2.0 * ax {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Clips a segment to `[0, w] x [0, h]` (Liang-Barsky).
fn clip_segment(a: (f64, f64), b: (f64, f64), w: f64, h: f64) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [(-dx, a.0), (dx, w - a.0), (-dy, a.1), (dy, h - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 || !t0.is_finite() || !t1.is_finite() {
        return None;
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

impl CellCanvas {
    pub fn new(cols: usize, rows: usize, ascii: bool) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
            ascii,
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::default(); cols * rows];
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_ascii(&self) -> bool {
        self.ascii
    }

    pub fn set_ascii(&mut self, ascii: bool) {
        self.ascii = ascii;
    }

    /// Virtual pixel size of the canvas.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.cols as f64 * CELL_WIDTH, self.rows as f64 * CELL_HEIGHT)
    }

    /// Virtual pixel at the center of a cell.
    pub fn cell_center(col: u16, row: u16) -> ScreenPoint {
        ScreenPoint::new(
            (f64::from(col) + 0.5) * CELL_WIDTH,
            (f64::from(row) + 0.5) * CELL_HEIGHT,
        )
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// The characters of one row.
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.rows {
            return String::new();
        }
        self.cells[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|c| c.ch)
            .collect()
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        self.cells.get_mut(row as usize * self.cols + col as usize)
    }

    fn to_cells(p: ScreenPoint) -> (f64, f64) {
        (p.x / CELL_WIDTH, p.y / CELL_HEIGHT)
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current: Option<(Color, Color)> = None;
        for row in 0..self.rows {
            writer.queue(MoveTo(0, row as u16))?;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if !self.ascii && current != Some((cell.fg, cell.bg)) {
                    writer.queue(SetForegroundColor(term_color(cell.fg)))?;
                    writer.queue(SetBackgroundColor(term_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                writer.queue(Print(cell.ch))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn term_color(c: Color) -> TermColor {
    TermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

impl Surface for CellCanvas {
    fn clear(&mut self, top: Color, bottom: Color) {
        let span = self.rows.saturating_sub(1).max(1) as f64;
        for row in 0..self.rows {
            let bg = lerp(top, bottom, row as f64 / span);
            for cell in &mut self.cells[row * self.cols..(row + 1) * self.cols] {
                *cell = Cell {
                    ch: ' ',
                    fg: Color::BLACK,
                    bg,
                };
            }
        }
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        if points.len() < 3 {
            return;
        }
        let polygon: Vec<(f64, f64)> = points.iter().map(|p| Self::to_cells(*p)).collect();
        if polygon.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }
        let min_x = polygon.iter().map(|p| p.0).fold(f64::INFINITY, f64::min).floor().max(0.0);
        let max_x = polygon.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max).ceil().min(self.cols as f64);
        let min_y = polygon.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor().max(0.0);
        let max_y = polygon.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).ceil().min(self.rows as f64);

        let ascii = self.ascii;
        let shade = ramp_char(color);
        for row in (min_y as i64)..(max_y as i64) {
            for col in (min_x as i64)..(max_x as i64) {
                if !contains(&polygon, col as f64 + 0.5, row as f64 + 0.5) {
                    continue;
                }
                if let Some(cell) = self.cell_mut(col, row) {
                    if ascii {
                        cell.ch = shade;
                    } else {
                        cell.bg = blend(color, cell.bg);
                        cell.ch = ' ';
                    }
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[ScreenPoint], color: Color) {
        if points.len() < 2 {
            return;
        }
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.draw_line(from, to, color, LineStyle::solid(1.0));
        }
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Color, style: LineStyle) {
        let a = Self::to_cells(from);
        let b = Self::to_cells(to);
        let Some((a, b)) = clip_segment(a, b, self.cols as f64, self.rows as f64) else {
            return;
        };
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let ch = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        let ascii = self.ascii;
        for i in 0..=steps {
            if style.dashed && i % 2 == 1 {
                continue;
            }
            let t = i as f64 / steps as f64;
            let col = (a.0 + dx * t).floor() as i64;
            let row = (a.1 + dy * t).floor() as i64;
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = ch;
                if !ascii {
                    cell.fg = blend(color, cell.bg);
                }
            }
        }
    }

    fn draw_text(&mut self, at: ScreenPoint, text: &str, color: Color) {
        let (x, y) = Self::to_cells(at);
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let width = text.chars().count() as f64;
        let start = (x - width / 2.0).round() as i64;
        let row = y.floor() as i64;
        let ascii = self.ascii;
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as i64, row) {
                cell.ch = ch;
                if !ascii {
                    cell.fg = color;
                }
            }
        }
    }
}
