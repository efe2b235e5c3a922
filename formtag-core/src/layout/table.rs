//! Table cell detection
//!
//! The compiler only needs the cell rectangles of a page. Where they come
//! from is pluggable: cells declared by the layout engine, or cells
//! reconstructed from the ruling lines that draw the table grid.

use super::{reading_order, Ruling, SourcePage};
use crate::geometry::Rectangle;

/// Capability that lists the table cells of a page, in reading order
pub trait TableDetector {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle>;
}

impl<T: TableDetector + ?Sized> TableDetector for &T {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle> {
        (**self).detect_tables(page)
    }
}

impl<T: TableDetector + ?Sized> TableDetector for Box<T> {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle> {
        (**self).detect_tables(page)
    }
}

/// Cells exactly as the layout engine declared them
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredCells;

impl TableDetector for DeclaredCells {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle> {
        page.cells
            .iter()
            .copied()
            .filter(|cell| !cell.is_degenerate())
            .collect()
    }
}

/// Rebuilds a cell grid from horizontal and vertical rulings
#[derive(Debug, Clone, Copy)]
pub struct RulingGridDetector {
    /// How far apart two coordinates may be and still count as the same line
    pub tolerance: f64,
    /// Smallest cell extent kept
    pub min_cell_size: f64,
}

impl Default for RulingGridDetector {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            min_cell_size: 4.0,
        }
    }
}

impl RulingGridDetector {
    /// Distinct coordinates, merging values closer than the tolerance
    fn cluster(&self, mut values: Vec<f64>) -> Vec<f64> {
        values.sort_by(f64::total_cmp);
        let mut clustered: Vec<f64> = Vec::new();
        for value in values {
            match clustered.last() {
                Some(last) if value - last <= self.tolerance => {}
                _ => clustered.push(value),
            }
        }
        clustered
    }

    /// Whether a horizontal ruling at `y` covers `[x0, x1]`
    fn has_horizontal(&self, rulings: &[Ruling], y: f64, x0: f64, x1: f64) -> bool {
        rulings.iter().any(|r| {
            (r.y0 - y).abs() <= self.tolerance
                && r.x0.min(r.x1) <= x0 + self.tolerance
                && r.x0.max(r.x1) >= x1 - self.tolerance
        })
    }

    /// Whether a vertical ruling at `x` covers `[y0, y1]`
    fn has_vertical(&self, rulings: &[Ruling], x: f64, y0: f64, y1: f64) -> bool {
        rulings.iter().any(|r| {
            (r.x0 - x).abs() <= self.tolerance
                && r.y0.min(r.y1) <= y0 + self.tolerance
                && r.y0.max(r.y1) >= y1 - self.tolerance
        })
    }
}

impl TableDetector for RulingGridDetector {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle> {
        let (horizontal, vertical): (Vec<Ruling>, Vec<Ruling>) = page
            .rulings
            .iter()
            .copied()
            .filter(|r| r.is_horizontal(self.tolerance) || r.is_vertical(self.tolerance))
            .partition(|r| r.is_horizontal(self.tolerance));
        if horizontal.len() < 2 || vertical.len() < 2 {
            return Vec::new();
        }

        let rows = self.cluster(horizontal.iter().map(|r| r.y0).collect());
        let columns = self.cluster(vertical.iter().map(|r| r.x0).collect());

        let mut cells = Vec::new();
        for pair in rows.windows(2) {
            let (top, bottom) = (pair[0], pair[1]);
            if bottom - top < self.min_cell_size {
                continue;
            }
            let mut start = 0;
            while start + 1 < columns.len() {
                let left = columns[start];
                if !self.has_vertical(&vertical, left, top, bottom) {
                    start += 1;
                    continue;
                }
                // A missing inner border means the cell spans several columns
                let end = (start + 1..columns.len()).find(|&end| {
                    self.has_vertical(&vertical, columns[end], top, bottom)
                        && self.has_horizontal(&horizontal, top, left, columns[end])
                        && self.has_horizontal(&horizontal, bottom, left, columns[end])
                });
                match end {
                    Some(end) => {
                        let cell = Rectangle::from_corners(left, top, columns[end], bottom);
                        if cell.width >= self.min_cell_size {
                            cells.push(cell);
                        }
                        start = end;
                    }
                    None => start += 1,
                }
            }
        }
        cells
    }
}

/// Declared cells when the page has any, otherwise the ruling grid
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutTables {
    pub declared: DeclaredCells,
    pub grid: RulingGridDetector,
}

impl TableDetector for LayoutTables {
    fn detect_tables(&self, page: &SourcePage) -> Vec<Rectangle> {
        let cells = match self.declared.detect_tables(page) {
            cells if !cells.is_empty() => cells,
            _ => self.grid.detect_tables(page),
        };
        let order = reading_order(&cells, self.grid.tolerance);
        order.into_iter().map(|i| cells[i]).collect()
    }
}
