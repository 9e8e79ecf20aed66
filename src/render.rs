//! Plain-text frames of the field, one character per cell.

use ecosim_core::{LifeFormView, Point, Region, RenderSink, SimTime};
use std::fmt::Write as _;

pub struct AsciiGrid {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    bounds: Option<Region>,
    time: SimTime,
    frame: String,
    echo: bool,
}

impl AsciiGrid {
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
            bounds: None,
            time: 0.0,
            frame: String::new(),
            echo: false,
        }
    }

    /// Also print every finished frame to stdout.
    #[must_use]
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    /// The last finished frame.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }

    fn cell_of(&self, x: f64, y: f64) -> Option<usize> {
        let bounds = self.bounds?;
        if !bounds.contains(&Point::new(x, y)) {
            return None;
        }
        let col = ((x - bounds.x_min) / bounds.width() * self.cols as f64) as usize;
        let row = ((y - bounds.y_min) / bounds.height() * self.rows as f64) as usize;
        Some(row.min(self.rows - 1) * self.cols + col.min(self.cols - 1))
    }
}

impl RenderSink for AsciiGrid {
    fn begin(&mut self, time: SimTime, bounds: Region) {
        self.time = time;
        self.bounds = Some(bounds);
        self.cells.fill(' ');
    }

    fn draw(&mut self, life: &LifeFormView) {
        if let Some(cell) = self.cell_of(life.position.x, life.position.y) {
            // anything beats empty space; predators beat plants
            let current = self.cells[cell];
            if current == ' ' || current == '.' {
                self.cells[cell] = life.glyph;
            }
        }
    }

    fn finish(&mut self) {
        self.frame.clear();
        let border = "-".repeat(self.cols);
        let _ = writeln!(self.frame, "t = {:.2}", self.time);
        let _ = writeln!(self.frame, "+{border}+");
        for row in self.cells.chunks(self.cols) {
            self.frame.push('|');
            self.frame.extend(row.iter());
            self.frame.push_str("|\n");
        }
        let _ = writeln!(self.frame, "+{border}+");
        if self.echo {
            print!("{}", self.frame);
        }
    }
}
