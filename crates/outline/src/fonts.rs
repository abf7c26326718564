//! Document-wide font-size statistics.
//!
//! A single scan over every span yields a frequency table of rounded font
//! sizes, from which the body size and the H1/H2/H3 cutoffs are derived.

use std::collections::HashMap;

use crate::types::{FontThresholds, Page};

/// Font sizes are rounded to one decimal before counting.
fn tenths(size: f32) -> i32 {
    (size * 10.0).round() as i32
}

/// Scan all spans and derive the per-document [`FontThresholds`].
///
/// Returns `None` when no non-empty span exists anywhere -- the caller must
/// treat that as "no headings producible".
///
/// The body size is the most frequent size, ties broken toward the larger
/// size. Documents with at least four distinct sizes encode heading rank
/// directly in the size ranking, so the top three sizes become H1/H2/H3;
/// flatter documents get a synthetic ramp of body-size multiples instead.
pub fn analyze_font_sizes(pages: &[Page]) -> Option<FontThresholds> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for page in pages {
        for span in page.spans() {
            if !span.is_empty() {
                *counts.entry(tenths(span.size)).or_insert(0) += 1;
            }
        }
    }

    if counts.is_empty() {
        return None;
    }

    // Most frequent size wins; on equal frequency the larger size does.
    let mut by_frequency: Vec<(i32, usize)> = counts.iter().map(|(&k, &v)| (k, v)).collect();
    by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    let body = by_frequency[0].0 as f32 / 10.0;

    let mut unique: Vec<i32> = counts.keys().copied().collect();
    unique.sort_by(|a, b| b.cmp(a));

    if unique.len() >= 4 {
        let pick = |i: usize| unique[i.min(unique.len() - 1)] as f32 / 10.0;
        Some(FontThresholds {
            body,
            h1: pick(0),
            h2: pick(1),
            h3: pick(2),
        })
    } else {
        Some(FontThresholds {
            body,
            h1: body * 1.35,
            h2: body * 1.25,
            h3: body * 1.15,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Line, Rect, Span};

    fn span(size: f32) -> Span {
        Span {
            text: "x".to_string(),
            size,
            font: "TestFont".to_string(),
            flags: 0,
            bbox: Rect::default(),
        }
    }

    fn page_of_sizes(sizes: &[f32]) -> Page {
        let lines = sizes.iter().map(|&s| Line::new(vec![span(s)])).collect();
        Page {
            number: 1,
            blocks: vec![Block { lines }],
        }
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn ratio_fallback_with_few_distinct_sizes() {
        let pages = vec![page_of_sizes(&[12.0, 12.0, 12.0, 14.0, 14.0, 18.0])];
        let t = analyze_font_sizes(&pages).unwrap();
        assert!(close(t.body, 12.0), "body should be 12.0, got {}", t.body);
        assert!(close(t.h3, 13.8));
        assert!(close(t.h2, 15.0));
        assert!(close(t.h1, 16.2));
    }

    #[test]
    fn direct_ranking_with_four_distinct_sizes() {
        let pages = vec![page_of_sizes(&[
            10.0, 10.0, 10.0, 10.0, 12.0, 12.0, 14.0, 16.0,
        ])];
        let t = analyze_font_sizes(&pages).unwrap();
        assert!(close(t.body, 10.0));
        assert!(close(t.h1, 16.0));
        assert!(close(t.h2, 14.0));
        assert!(close(t.h3, 12.0));
    }

    #[test]
    fn frequency_tie_prefers_larger_size() {
        let pages = vec![page_of_sizes(&[11.0, 11.0, 13.0, 13.0])];
        let t = analyze_font_sizes(&pages).unwrap();
        assert!(close(t.body, 13.0));
    }

    #[test]
    fn sizes_rounded_to_one_decimal() {
        // 11.93 lands in the 11.9 bucket; 12.02 and 12.04 share the 12.0 one.
        let pages = vec![page_of_sizes(&[12.02, 12.04, 12.04, 11.93])];
        let t = analyze_font_sizes(&pages).unwrap();
        assert!(close(t.body, 12.0));
    }

    #[test]
    fn empty_document_yields_none() {
        assert!(analyze_font_sizes(&[]).is_none());
    }

    #[test]
    fn whitespace_only_spans_do_not_count() {
        let mut page = page_of_sizes(&[12.0]);
        page.blocks[0].lines[0].spans[0].text = "   ".to_string();
        assert!(analyze_font_sizes(&[page]).is_none());
    }
}
