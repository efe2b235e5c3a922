//! Locating tag-shaped text in a laid-out document

mod text_run;

pub use text_run::{ScanOptions, TextRunScanner};

use crate::geometry::Rectangle;
use crate::layout::SourceDocument;
use serde::Serialize;

/// Characters `start..end` of one span's original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub span: usize,
    pub start: usize,
    pub end: usize,
}

/// One located instance of tag syntax
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagOccurrence {
    /// Zero-based page index
    pub page: usize,
    /// Matched text after invisible-character removal and NFKC
    pub raw: String,
    /// Measured bounds of the matched text
    pub bounds: Rectangle,
    /// Enclosing table cell, if the tag sits in one
    pub cell: Option<Rectangle>,
    /// Where the tag's characters live in the source spans
    pub segments: Vec<TextSegment>,
    pub font: Option<String>,
    pub font_size: Option<f64>,
}

impl TagOccurrence {
    pub fn new(page: usize, raw: impl Into<String>, bounds: Rectangle) -> Self {
        Self {
            page,
            raw: raw.into(),
            bounds,
            cell: None,
            segments: Vec::new(),
            font: None,
            font_size: None,
        }
    }

    pub fn with_cell(mut self, cell: Option<Rectangle>) -> Self {
        self.cell = cell;
        self
    }

    pub fn with_segments(mut self, segments: Vec<TextSegment>) -> Self {
        self.segments = segments;
        self
    }
}

/// Produces the tag occurrences of a document.
///
/// The iterator is finite, single pass, and yields occurrences in document
/// order.
pub trait DocumentScanner {
    fn scan<'a>(&'a self, document: &'a SourceDocument)
        -> Box<dyn Iterator<Item = TagOccurrence> + 'a>;
}
