//! Widget placement
//!
//! A tag inside a table cell fills the cell, less a margin that keeps the
//! widget off the cell borders. A tag in running text keeps the rectangle of
//! its own text. Explicit size options replace either dimension.

use crate::forms::FieldSpec;
use crate::geometry::Rectangle;
use crate::scan::TagOccurrence;
use serde::{Deserialize, Serialize};

/// Geometry constants for placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Gap kept between a widget and its cell borders
    pub cell_margin: f64,
    /// Share of the tag's area that must fall inside a cell for the tag to be enclosed
    pub min_cell_coverage: f64,
    /// Vertical distance within which text counts as the same line
    pub line_tolerance: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            cell_margin: 1.0,
            min_cell_coverage: 0.5,
            line_tolerance: 2.0,
        }
    }
}

/// Final widget rectangle and how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub rect: Rectangle,
    /// Cell the widget was fitted into
    pub cell: Option<Rectangle>,
    /// An override was larger than the cell and was cut back
    pub clamped: bool,
    /// A degenerate dimension was replaced by the field's default size
    pub defaulted: bool,
}

/// Cell holding `bounds`, if any.
///
/// Among cells overlapping the tag the one with the largest overlap wins;
/// on a tie the earlier cell in `cells` wins. The winner must cover at least
/// `min_coverage` of the tag's area.
pub fn find_enclosing_cell(
    bounds: &Rectangle,
    cells: &[Rectangle],
    min_coverage: f64,
) -> Option<Rectangle> {
    let mut best: Option<(f64, Rectangle)> = None;
    for cell in cells {
        let overlap = bounds.overlap_area(cell);
        if overlap <= 0.0 {
            continue;
        }
        if best.map_or(true, |(area, _)| overlap > area) {
            best = Some((overlap, *cell));
        }
    }

    let (overlap, cell) = best?;
    let area = bounds.area();
    if area <= 0.0 {
        // A zero-height tag can only be located by its position
        return cell.contains(bounds, 0.0).then_some(cell);
    }
    (overlap / area >= min_coverage).then_some(cell)
}

/// Compute the rectangle a field occupies. Never fails.
pub fn place(occurrence: &TagOccurrence, spec: &FieldSpec, config: &PlacementConfig) -> Placement {
    let width = spec.options.width_override();
    let height = spec.options.height_override();
    let mut clamped = false;

    let mut rect = match occurrence.cell {
        Some(cell) => {
            let inner = match cell.inset(config.cell_margin) {
                inner if inner.is_degenerate() => cell,
                inner => inner,
            };
            let mut fit = |requested: Option<f64>, available: f64| match requested {
                Some(size) if size > available => {
                    clamped = true;
                    available
                }
                Some(size) => size,
                None => available,
            };
            let w = fit(width, inner.width);
            let h = fit(height, inner.height);
            Rectangle::new(inner.x, inner.y, w, h)
        }
        None => {
            let bounds = occurrence.bounds;
            Rectangle::new(
                bounds.x,
                bounds.y,
                width.unwrap_or(bounds.width),
                height.unwrap_or(bounds.height),
            )
        }
    };

    let mut defaulted = false;
    let (default_width, default_height) = spec.widget.default_size(spec.multiline());
    if !(rect.width > 0.0 && rect.width.is_finite()) {
        rect.width = default_width;
        defaulted = true;
    }
    if !(rect.height > 0.0 && rect.height.is_finite()) {
        rect.height = default_height;
        defaulted = true;
    }

    if spec.widget.is_square() {
        rect = rect.centered_square();
    }

    Placement {
        rect,
        cell: occurrence.cell,
        clamped,
        defaulted,
    }
}
