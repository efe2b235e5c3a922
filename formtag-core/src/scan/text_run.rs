//! Reference scanner over positioned text runs

use super::{DocumentScanner, TagOccurrence, TextSegment};
use crate::geometry::Rectangle;
use crate::layout::{
    find_enclosing_cell, reading_order, LayoutTables, SourceDocument, SourcePage, TableDetector,
};
use crate::tag::is_invisible;
use unicode_normalization::UnicodeNormalization;

/// Options for scanning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    /// Vertical distance within which spans count as one line
    pub line_tolerance: f64,
    /// Share of a tag's area a cell must cover to enclose it
    pub min_cell_coverage: f64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            min_cell_coverage: 0.5,
        }
    }
}

/// Finds tags in the text runs of each page, joining runs in reading order
/// so a tag split across runs or lines is still found.
#[derive(Debug, Clone, Default)]
pub struct TextRunScanner<D = LayoutTables> {
    detector: D,
    options: ScanOptions,
}

/// Origin of one character of the joined page text
#[derive(Debug, Clone, Copy)]
struct CharOrigin {
    byte: usize,
    span: usize,
    index: usize,
}

/// A page's spans joined into one searchable string
struct PageText {
    text: String,
    origins: Vec<CharOrigin>,
}

impl TextRunScanner<LayoutTables> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: TableDetector> TextRunScanner<D> {
    pub fn with_detector(detector: D) -> Self {
        Self {
            detector,
            options: ScanOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Every occurrence on one page, in reading order
    pub fn scan_page(&self, page_index: usize, page: &SourcePage) -> Vec<TagOccurrence> {
        let joined = self.join_spans(page);
        let matches = find_tags(&joined.text);
        if matches.is_empty() {
            return Vec::new();
        }

        let cells = self.detector.detect_tables(page);
        tracing::debug!(
            page = page_index,
            tags = matches.len(),
            cells = cells.len(),
            "scanned page"
        );

        matches
            .into_iter()
            .filter_map(|(start, end)| {
                let first = joined.origins.partition_point(|o| o.byte < start);
                let last = joined.origins.partition_point(|o| o.byte < end);
                let segments = segments_of(&joined.origins[first..last]);
                let bounds = segments
                    .iter()
                    .map(|segment| segment_rect(page, segment))
                    .reduce(|a, b| a.union(&b))?;

                let font_span = &page.spans[segments[0].span];
                let mut occurrence = TagOccurrence::new(page_index, &joined.text[start..end], bounds)
                    .with_cell(find_enclosing_cell(
                        &bounds,
                        &cells,
                        self.options.min_cell_coverage,
                    ))
                    .with_segments(segments);
                occurrence.font = font_span.font.clone();
                occurrence.font_size = font_span.font_size;
                Some(occurrence)
            })
            .collect()
    }

    fn join_spans(&self, page: &SourcePage) -> PageText {
        let boxes: Vec<Rectangle> = page.spans.iter().map(|s| s.bbox).collect();
        let mut text = String::new();
        let mut origins = Vec::new();
        let mut previous_top: Option<f64> = None;

        for span_index in reading_order(&boxes, self.options.line_tolerance) {
            let span = &page.spans[span_index];
            if let Some(top) = previous_top {
                if (span.bbox.y - top).abs() > self.options.line_tolerance {
                    text.push('\n');
                }
            }
            previous_top = Some(span.bbox.y);

            for (index, c) in span.text.chars().enumerate() {
                if is_invisible(c) {
                    continue;
                }
                for normalized in std::iter::once(c).nfkc() {
                    origins.push(CharOrigin {
                        byte: text.len(),
                        span: span_index,
                        index,
                    });
                    text.push(normalized);
                }
            }
        }

        PageText { text, origins }
    }
}

/// End of a doubled brace (`{{`, `} }`, ...) starting at byte `at`
fn doubled(text: &str, at: usize, brace: char) -> Option<usize> {
    let mut chars = text[at..].char_indices();
    match chars.next() {
        Some((_, c)) if c == brace => {}
        _ => return None,
    }
    chars
        .find(|(_, c)| !c.is_whitespace())
        .filter(|(_, c)| *c == brace)
        .map(|(offset, c)| at + offset + c.len_utf8())
}

/// Start and body start of the first `{{` at or after `from`
fn next_open(text: &str, from: usize) -> Option<(usize, usize)> {
    text[from..]
        .char_indices()
        .filter(|(_, c)| *c == '{')
        .find_map(|(offset, _)| doubled(text, from + offset, '{').map(|body| (from + offset, body)))
}

/// Where the body of a tag stops
enum TagEnd {
    /// Byte just past the closing braces
    Closed(usize),
    /// Another tag opens at this byte before this one closed
    Reopened(usize),
    /// Text ran out
    Unterminated,
}

fn tag_end(text: &str, body: usize) -> TagEnd {
    // single braces nest, so `{5}` in a regex literal does not close the tag
    let mut depth = 0usize;
    for (offset, c) in text[body..].char_indices() {
        let at = body + offset;
        match c {
            '{' if doubled(text, at, '{').is_some() => return TagEnd::Reopened(at),
            '{' => depth += 1,
            '}' if depth > 0 => depth -= 1,
            '}' => {
                if let Some(end) = doubled(text, at, '}') {
                    return TagEnd::Closed(end);
                }
            }
            _ => {}
        }
    }
    TagEnd::Unterminated
}

/// Byte ranges of tag-shaped text.
///
/// A tag runs from `{{` to its `}}`. A tag that is still open when the next
/// `{{` starts, or when the text ends, is cut there so it cannot swallow the
/// tags after it.
fn find_tags(text: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some((start, body)) = next_open(text, cursor) {
        match tag_end(text, body) {
            TagEnd::Closed(end) => {
                found.push((start, end));
                cursor = end;
            }
            TagEnd::Reopened(next) => {
                found.push((start, start + text[start..next].trim_end().len()));
                cursor = next;
            }
            TagEnd::Unterminated => {
                found.push((start, start + text[start..].trim_end().len()));
                break;
            }
        }
    }
    found
}

/// Contiguous character ranges per span, in the order the tag visits them
fn segments_of(origins: &[CharOrigin]) -> Vec<TextSegment> {
    let mut segments: Vec<TextSegment> = Vec::new();
    for origin in origins {
        match segments.last_mut() {
            Some(segment) if segment.span == origin.span => {
                segment.start = segment.start.min(origin.index);
                segment.end = segment.end.max(origin.index + 1);
            }
            _ => segments.push(TextSegment {
                span: origin.span,
                start: origin.index,
                end: origin.index + 1,
            }),
        }
    }
    segments
}

/// Portion of a span's box covered by a segment, estimated from character counts.
///
/// Boundaries inside the span are pulled in by half a character.
fn segment_rect(page: &SourcePage, segment: &TextSegment) -> Rectangle {
    let span = &page.spans[segment.span];
    let count = span.text.chars().count().max(1);
    let char_width = span.bbox.width / count as f64;

    let mut left = span.bbox.x + segment.start as f64 * char_width;
    let mut right = span.bbox.x + segment.end as f64 * char_width;
    let pulled_left = if segment.start > 0 { left + char_width / 2.0 } else { left };
    let pulled_right = if segment.end < count { right - char_width / 2.0 } else { right };
    if pulled_right > pulled_left {
        left = pulled_left;
        right = pulled_right;
    }

    Rectangle::new(left, span.bbox.y, right - left, span.bbox.height)
}

impl<D: TableDetector> DocumentScanner for TextRunScanner<D> {
    fn scan<'a>(
        &'a self,
        document: &'a SourceDocument,
    ) -> Box<dyn Iterator<Item = TagOccurrence> + 'a> {
        Box::new(
            document
                .pages
                .iter()
                .enumerate()
                .flat_map(move |(index, page)| self.scan_page(index, page)),
        )
    }
}
