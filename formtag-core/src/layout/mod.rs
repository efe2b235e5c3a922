//! Laid-out source document
//!
//! A [`SourceDocument`] is what a layout engine reports for a rendered
//! document: page boxes, positioned text runs, and optionally the table cells
//! or ruling lines it found. Coordinates are page space (top-left origin).

mod placement;
mod table;

pub use placement::{find_enclosing_cell, place, Placement, PlacementConfig};
pub use table::{DeclaredCells, LayoutTables, RulingGridDetector, TableDetector};

use crate::error::{FormError, Result};
use crate::geometry::Rectangle;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Whole document, pages in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub pages: Vec<SourcePage>,
}

/// One rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePage {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub spans: Vec<TextSpan>,
    /// Table cells reported by the layout engine
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cells: Vec<Rectangle>,
    /// Drawn table borders
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rulings: Vec<Ruling>,
}

/// A positioned run of text in a single font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    pub text: String,
    pub bbox: Rectangle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

/// A straight line segment drawn on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruling {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl SourcePage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            spans: Vec::new(),
            cells: Vec::new(),
            rulings: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.spans.push(span);
        self
    }

    pub fn with_cell(mut self, cell: Rectangle) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn with_ruling(mut self, ruling: Ruling) -> Self {
        self.rulings.push(ruling);
        self
    }

    /// The page box in page space
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }
}

impl TextSpan {
    pub fn new(text: impl Into<String>, bbox: Rectangle) -> Self {
        Self {
            text: text.into(),
            bbox,
            font: None,
            font_size: None,
        }
    }

    pub fn with_font(mut self, font: impl Into<String>, size: f64) -> Self {
        self.font = Some(font.into());
        self.font_size = Some(size);
        self
    }
}

impl Ruling {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        Self::new(x0.min(x1), y, x0.max(x1), y)
    }

    pub fn vertical(x: f64, y0: f64, y1: f64) -> Self {
        Self::new(x, y0.min(y1), x, y0.max(y1))
    }

    pub fn is_horizontal(&self, tolerance: f64) -> bool {
        (self.y1 - self.y0).abs() <= tolerance && (self.x1 - self.x0).abs() > tolerance
    }

    pub fn is_vertical(&self, tolerance: f64) -> bool {
        (self.x1 - self.x0).abs() <= tolerance && (self.y1 - self.y0).abs() > tolerance
    }
}

impl SourceDocument {
    pub fn new(pages: Vec<SourcePage>) -> Self {
        Self { pages }
    }

    /// Parse and validate a JSON layout
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SourceDocument = serde_json::from_str(json)
            .map_err(|e| FormError::InvalidDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: SourceDocument = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                FormError::Io(e.into())
            } else {
                FormError::InvalidDocument(e.to_string())
            }
        })?;
        document.validate()?;
        Ok(document)
    }

    /// Reject geometry no placement could be computed from
    pub fn validate(&self) -> Result<()> {
        for (index, page) in self.pages.iter().enumerate() {
            if !(page.width.is_finite() && page.height.is_finite())
                || page.width <= 0.0
                || page.height <= 0.0
            {
                return Err(FormError::InvalidDocument(format!(
                    "page {index} has invalid size {}x{}",
                    page.width, page.height
                )));
            }
            let spans = page.spans.iter().map(|s| &s.bbox);
            for rect in spans.chain(page.cells.iter()) {
                if ![rect.x, rect.y, rect.width, rect.height]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    return Err(FormError::InvalidDocument(format!(
                        "page {index} has a non-finite rectangle"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn page(&self, index: usize) -> Option<&SourcePage> {
        self.pages.get(index)
    }
}

/// Indices of `rects` in reading order: top to bottom by line, then left to right.
///
/// Rectangles whose tops lie within `line_tolerance` of a line's first
/// rectangle belong to that line.
pub fn reading_order(rects: &[Rectangle], line_tolerance: f64) -> Vec<usize> {
    let mut by_top: Vec<usize> = (0..rects.len()).collect();
    by_top.sort_by(|&a, &b| rects[a].y.total_cmp(&rects[b].y));

    let mut lines = vec![0usize; rects.len()];
    let mut line = 0;
    let mut line_top = f64::NEG_INFINITY;
    for (position, &index) in by_top.iter().enumerate() {
        if position > 0 && rects[index].y - line_top > line_tolerance {
            line += 1;
            line_top = rects[index].y;
        } else if position == 0 {
            line_top = rects[index].y;
        }
        lines[index] = line;
    }

    by_top.sort_by(|&a, &b| {
        lines[a]
            .cmp(&lines[b])
            .then(rects[a].x.total_cmp(&rects[b].x))
    });
    by_top
}
