use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text;

/// Style flag bit marking a bold span, mirroring the convention of the
/// layout parser that produces the spans.
pub const FLAG_BOLD: u32 = 1 << 1;

/// Axis-aligned bounding box of a span, in page points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect { x0, y0, x1, y1 }
    }
}

/// A single styled text run, the atomic unit produced by the layout parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    /// Font size in points.
    pub size: f32,
    /// Base font name (e.g. `Helvetica-Bold`).
    pub font: String,
    /// Style flag bitset; see [`FLAG_BOLD`].
    pub flags: u32,
    pub bbox: Rect,
}

impl Span {
    /// A span counts as bold when either the font name says so or the style
    /// flags do.
    pub fn is_bold(&self) -> bool {
        self.flags & FLAG_BOLD != 0 || self.font.to_lowercase().contains("bold")
    }

    /// A span with only whitespace carries no visual text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An ordered run of spans sharing a visual baseline.
///
/// The heuristics never store derived attributes on the line; text, mean
/// size, boldness, and column positions are recomputed from the spans.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new(spans: Vec<Span>) -> Self {
        Line { spans }
    }

    /// Cleaned, concatenated text of all non-empty spans.
    pub fn text(&self) -> String {
        let joined = self
            .spans
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        text::clean_text(&joined)
    }

    /// Arithmetic mean of the non-empty spans' font sizes.
    pub fn mean_size(&self) -> Option<f32> {
        let sizes: Vec<f32> = self
            .spans
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.size)
            .collect();
        if sizes.is_empty() {
            return None;
        }
        Some(sizes.iter().sum::<f32>() / sizes.len() as f32)
    }

    /// True when any non-empty span is bold.
    pub fn any_bold(&self) -> bool {
        self.spans.iter().any(|s| !s.is_empty() && s.is_bold())
    }

    /// Rounded left x-positions of the non-empty spans, in span order.
    /// Recurring positions across a line indicate tabular columns.
    pub fn left_edges(&self) -> Vec<i32> {
        self.spans
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.bbox.x0.round() as i32)
            .collect()
    }
}

/// A vertical group of consecutive lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub lines: Vec<Line>,
}

/// One page of the document. Page numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub blocks: Vec<Block>,
}

impl Page {
    /// Iterate over every line on the page in reading order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.blocks.iter().flat_map(|b| b.lines.iter())
    }

    /// Iterate over every span on the page in reading order.
    pub fn spans(&self) -> impl Iterator<Item = &Span> {
        self.lines().flat_map(|l| l.spans.iter())
    }
}

/// Font-size cutoffs derived once per document and read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontThresholds {
    /// The document's normal paragraph size, by frequency.
    pub body: f32,
    pub h1: f32,
    pub h2: f32,
    pub h3: f32,
}

/// Rank of a heading in the inferred outline hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// One entry of the extracted outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

/// The final result for one document. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub title: String,
    pub outline: Vec<HeadingRecord>,
}

/// Outcome of processing one document.
///
/// Replaces exception-style control flow: the batch driver branches on this
/// instead of catching errors, and degraded documents still produce JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Success(ExtractionResult),
    /// The document opened fine but has zero pages.
    EmptyDocument,
    /// The document could not be opened or parsed at all.
    ParseFailure(String),
}

impl Extraction {
    /// Collapse the outcome into the JSON-facing result, degrading failures
    /// to the sentinel titles with an empty outline.
    pub fn into_result(self) -> ExtractionResult {
        match self {
            Extraction::Success(result) => result,
            Extraction::EmptyDocument => ExtractionResult {
                title: "Empty Document".to_string(),
                outline: Vec::new(),
            },
            Extraction::ParseFailure(_) => ExtractionResult {
                title: "Error".to_string(),
                outline: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, x0: f32) -> Span {
        Span {
            text: text.to_string(),
            size,
            font: "TestFont".to_string(),
            flags: 0,
            bbox: Rect::new(x0, 700.0, x0 + 50.0, 700.0 + size),
        }
    }

    #[test]
    fn span_bold_by_flag() {
        let mut s = span("x", 12.0, 0.0);
        s.flags = FLAG_BOLD;
        assert!(s.is_bold());
    }

    #[test]
    fn span_bold_by_font_name() {
        let mut s = span("x", 12.0, 0.0);
        s.font = "Arial-BoldMT".to_string();
        assert!(s.is_bold());
    }

    #[test]
    fn span_not_bold() {
        assert!(!span("x", 12.0, 0.0).is_bold());
    }

    #[test]
    fn line_text_skips_empty_spans() {
        let line = Line::new(vec![span("Hello", 12.0, 0.0), span("  ", 12.0, 40.0), span("World", 12.0, 80.0)]);
        assert_eq!(line.text(), "Hello World");
    }

    #[test]
    fn line_mean_size_ignores_empty_spans() {
        let line = Line::new(vec![span("a", 10.0, 0.0), span(" ", 99.0, 20.0), span("b", 14.0, 40.0)]);
        assert_eq!(line.mean_size(), Some(12.0));
    }

    #[test]
    fn line_mean_size_empty_line() {
        assert_eq!(Line::default().mean_size(), None);
    }

    #[test]
    fn left_edges_rounded() {
        let line = Line::new(vec![span("a", 12.0, 10.4), span("b", 12.0, 120.6)]);
        assert_eq!(line.left_edges(), vec![10, 121]);
    }

    #[test]
    fn heading_level_serializes_as_plain_name() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
    }

    #[test]
    fn extraction_degrades_to_sentinels() {
        assert_eq!(Extraction::EmptyDocument.into_result().title, "Empty Document");
        let failed = Extraction::ParseFailure("broken xref".to_string()).into_result();
        assert_eq!(failed.title, "Error");
        assert!(failed.outline.is_empty());
    }
}
