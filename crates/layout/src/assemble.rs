//! Geometry-driven assembly of extracted spans into the block/line/span
//! tree the heuristics consume.
//!
//! Spans sharing a baseline (within a tolerance) form a line; adjacent
//! same-style spans within a line are merged with gap-aware space
//! insertion; consecutive lines separated by a normal leading gap form a
//! block. No heading or content classification happens here.

use outline_core::{Block, Line, Page, Span};

/// Spans whose Y coordinates differ by less than this belong to one line.
const Y_TOLERANCE: f32 = 1.0;

/// Minimum horizontal gap (points) between adjacent spans before a space is
/// inserted when merging.
const MIN_WORD_GAP: f32 = 1.5;

/// A vertical gap larger than this multiple of the line's font size starts a
/// new block.
const BLOCK_GAP_FACTOR: f32 = 1.4;

/// Returns `true` for characters of scripts written without inter-word
/// spaces (CJK ideographs, kana, Hangul, Thai, and neighbors).
fn is_spaceless_script_char(c: char) -> bool {
    let cp = c as u32;
    matches!(
        cp,
        // CJK Unified Ideographs + Extension A/B + Compatibility
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF
        // Hiragana / Katakana
        | 0x3040..=0x309F
        | 0x30A0..=0x30FF
        | 0x31F0..=0x31FF
        // Hangul
        | 0xAC00..=0xD7AF
        | 0x1100..=0x11FF
        | 0x3130..=0x318F
        // CJK punctuation and fullwidth forms
        | 0x3000..=0x303F
        | 0xFF00..=0xFFEF
        // Thai, Lao, Myanmar, Khmer, Tibetan
        | 0x0E00..=0x0E7F
        | 0x0E80..=0x0EFF
        | 0x1000..=0x109F
        | 0x1780..=0x17FF
        | 0x0F00..=0x0FFF
    )
}

/// Whether the boundary between two adjacent spans sits between
/// spaceless-script characters (no space wanted).
fn boundary_is_spaceless(prev: &Span, next: &Span) -> bool {
    match (prev.text.chars().next_back(), next.text.chars().next()) {
        (Some(l), Some(r)) => is_spaceless_script_char(l) && is_spaceless_script_char(r),
        _ => false,
    }
}

/// Baseline Y of a line (first span; all spans are within tolerance).
fn line_y(line: &Line) -> f32 {
    line.spans.first().map(|s| s.bbox.y0).unwrap_or(0.0)
}

/// Group a page's flat span list into lines ordered top-to-bottom.
pub fn lines_from_spans(mut spans: Vec<Span>) -> Vec<Line> {
    if spans.is_empty() {
        return Vec::new();
    }

    // Y descending (top of page first), then X ascending.
    spans.sort_by(|a, b| {
        b.bbox
            .y0
            .partial_cmp(&a.bbox.y0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.bbox
                    .x0
                    .partial_cmp(&b.bbox.x0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<Span> = vec![spans.remove(0)];
    let mut current_y = current[0].bbox.y0;

    for span in spans {
        if (span.bbox.y0 - current_y).abs() <= Y_TOLERANCE {
            current.push(span);
        } else {
            lines.push(assemble_line(std::mem::take(&mut current)));
            current_y = span.bbox.y0;
            current.push(span);
        }
    }
    if !current.is_empty() {
        lines.push(assemble_line(current));
    }

    lines
}

/// Build a [`Line`] from spans known to share a baseline: sort
/// left-to-right, merge same-style neighbors, and insert spaces across
/// word-sized gaps.
fn assemble_line(mut spans: Vec<Span>) -> Line {
    spans.sort_by(|a, b| {
        a.bbox
            .x0
            .partial_cmp(&b.bbox.x0)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(prev) = merged.last_mut() {
            let gap = span.bbox.x0 - prev.bbox.x1;
            let same_style = prev.font == span.font
                && prev.flags == span.flags
                && (prev.size - span.size).abs() < 0.5;

            if same_style && gap < MIN_WORD_GAP && gap > -prev.size {
                // Adjacent or slightly overlapping: concatenate directly.
                prev.text.push_str(&span.text);
                prev.bbox.x1 = span.bbox.x1;
                continue;
            }

            if same_style && gap >= MIN_WORD_GAP && gap < prev.size * 2.0 {
                // A word gap within the same run.
                if !boundary_is_spaceless(prev, &span) {
                    prev.text.push(' ');
                }
                prev.text.push_str(&span.text);
                prev.bbox.x1 = span.bbox.x1;
                continue;
            }
        }

        merged.push(span);
    }

    Line::new(merged)
}

/// Group consecutive lines into blocks. A vertical gap larger than
/// [`BLOCK_GAP_FACTOR`] times the previous line's mean size breaks the
/// block.
pub fn blocks_from_lines(lines: Vec<Line>) -> Vec<Block> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut blocks: Vec<Block> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        if let Some(prev) = current.last() {
            let gap = (line_y(prev) - line_y(&line)).abs();
            let threshold = prev.mean_size().unwrap_or(12.0) * BLOCK_GAP_FACTOR;
            if gap > threshold {
                blocks.push(Block {
                    lines: std::mem::take(&mut current),
                });
            }
        }
        current.push(line);
    }
    if !current.is_empty() {
        blocks.push(Block { lines: current });
    }

    blocks
}

/// Assemble one page from its extracted spans.
pub fn page_from_spans(number: u32, spans: Vec<Span>) -> Page {
    Page {
        number,
        blocks: blocks_from_lines(lines_from_spans(spans)),
    }
}
