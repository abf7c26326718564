//! Heading extraction: the second full scan over the document.
//!
//! Every line is pushed through a gauntlet of filters (tabular layout, form
//! fields, shape-or-bold candidacy, title exclusion, deduplication) before
//! level classification assigns H1/H2/H3. Numbered prefixes always win over
//! font size.

use std::collections::HashSet;

use crate::text::{clean_text, is_form_field, is_likely_heading, normalize_key, numbered_heading_level};
use crate::types::{FontThresholds, HeadingLevel, HeadingRecord, Line, Page};

/// Classify a line's heading level.
///
/// A numbered section prefix decides the level outright; otherwise the mean
/// font size is compared against the thresholds, highest cutoff first.
/// `None` means the line is not a heading.
pub fn classify_heading_level(
    text: &str,
    size: f32,
    thresholds: &FontThresholds,
) -> Option<HeadingLevel> {
    if let Some(level) = numbered_heading_level(text) {
        return Some(level);
    }

    if size >= thresholds.h1 {
        Some(HeadingLevel::H1)
    } else if size >= thresholds.h2 {
        Some(HeadingLevel::H2)
    } else if size >= thresholds.h3 {
        Some(HeadingLevel::H3)
    } else {
        None
    }
}

/// Tabular-row test. Font-size heuristics misfire on table cells, so any
/// line whose non-empty spans repeat at least two left-edge positions, or
/// that carries four or more spans, is skipped outright.
pub fn is_table_like(line: &Line) -> bool {
    let edges = line.left_edges();
    if edges.len() < 2 {
        return false;
    }

    let mut repeated = 0usize;
    let mut seen: Vec<(i32, usize)> = Vec::new();
    for edge in &edges {
        match seen.iter_mut().find(|(e, _)| e == edge) {
            Some((_, count)) => {
                *count += 1;
                if *count == 2 {
                    repeated += 1;
                }
            }
            None => seen.push((*edge, 1)),
        }
    }

    repeated >= 2 || line.spans.len() >= 4
}

/// Walk every page in reading order and emit the ordered outline.
///
/// The title never appears in the outline, and no normalized heading text is
/// emitted twice anywhere in the document.
pub fn extract_headings(
    pages: &[Page],
    title: &str,
    thresholds: &FontThresholds,
) -> Vec<HeadingRecord> {
    let mut outline: Vec<HeadingRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let title_key = normalize_key(&clean_text(title));

    for page in pages {
        for line in page.lines() {
            let text = line.text();
            if text.is_empty() {
                continue;
            }
            let Some(size) = line.mean_size() else {
                continue;
            };

            if is_table_like(line) {
                continue;
            }

            if is_form_field(&text) {
                continue;
            }

            if !(is_likely_heading(&text, size, thresholds.body) || line.any_bold()) {
                continue;
            }

            let key = normalize_key(&text);
            if key == title_key {
                continue;
            }
            if seen.contains(&key) {
                continue;
            }

            let Some(level) = classify_heading_level(&text, size, thresholds) else {
                continue;
            };

            outline.push(HeadingRecord {
                level,
                // Trailing space preserved for output compatibility.
                text: format!("{} ", text),
                page: page.number,
            });
            seen.insert(key);
        }
    }

    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Block, Rect, Span, FLAG_BOLD};

    fn span_at(text: &str, size: f32, x0: f32) -> Span {
        Span {
            text: text.to_string(),
            size,
            font: "TestFont".to_string(),
            flags: 0,
            bbox: Rect::new(x0, 700.0, x0 + 40.0, 700.0 + size),
        }
    }

    fn line(text: &str, size: f32) -> Line {
        Line::new(vec![span_at(text, size, 72.0)])
    }

    fn bold_line(text: &str, size: f32) -> Line {
        let mut s = span_at(text, size, 72.0);
        s.flags = FLAG_BOLD;
        Line::new(vec![s])
    }

    fn page(number: u32, lines: Vec<Line>) -> Page {
        Page {
            number,
            blocks: vec![Block { lines }],
        }
    }

    fn thresholds() -> FontThresholds {
        FontThresholds {
            body: 12.0,
            h1: 20.0,
            h2: 16.0,
            h3: 14.0,
        }
    }

    // -- classify_heading_level ---------------------------------------------

    #[test]
    fn numbered_prefix_beats_font_size() {
        // Body-sized but numbered three levels deep: always H3.
        assert_eq!(
            classify_heading_level("2.3.1 Audience Details", 8.0, &thresholds()),
            Some(HeadingLevel::H3)
        );
        // Huge but numbered at one level: H1 by pattern, not by size.
        assert_eq!(
            classify_heading_level("7. Appendix", 40.0, &thresholds()),
            Some(HeadingLevel::H1)
        );
    }

    #[test]
    fn size_thresholds_highest_wins() {
        let t = thresholds();
        assert_eq!(classify_heading_level("Overview", 22.0, &t), Some(HeadingLevel::H1));
        assert_eq!(classify_heading_level("Overview", 17.0, &t), Some(HeadingLevel::H2));
        assert_eq!(classify_heading_level("Overview", 14.5, &t), Some(HeadingLevel::H3));
        assert_eq!(classify_heading_level("Overview", 12.0, &t), None);
    }

    // -- is_table_like ------------------------------------------------------

    #[test]
    fn four_spans_is_tabular() {
        let l = Line::new(vec![
            span_at("Name", 12.0, 72.0),
            span_at("Qty", 12.0, 200.0),
            span_at("Unit", 12.0, 300.0),
            span_at("Total", 12.0, 400.0),
        ]);
        assert!(is_table_like(&l));
    }

    #[test]
    fn repeated_columns_is_tabular() {
        let l = Line::new(vec![
            span_at("a", 12.0, 72.0),
            span_at("b", 12.0, 200.0),
            span_at("c", 12.0, 72.3),
            span_at("d", 12.0, 200.4),
        ]);
        assert!(is_table_like(&l));
    }

    #[test]
    fn single_span_is_not_tabular() {
        assert!(!is_table_like(&line("Introduction", 12.0)));
    }

    #[test]
    fn two_distinct_spans_are_not_tabular() {
        let l = Line::new(vec![span_at("Hello", 12.0, 72.0), span_at("World", 12.0, 300.0)]);
        assert!(!is_table_like(&l));
    }

    // -- extract_headings ---------------------------------------------------

    #[test]
    fn emits_reading_order_with_pages() {
        let pages = vec![
            page(1, vec![line("Introduction", 22.0), line("Background", 17.0)]),
            page(2, vec![line("Methodology", 22.0)]),
        ];
        let outline = extract_headings(&pages, "Untitled", &thresholds());
        assert_eq!(outline.len(), 3);
        assert_eq!(outline[0].text, "Introduction ");
        assert_eq!(outline[0].level, HeadingLevel::H1);
        assert_eq!(outline[0].page, 1);
        assert_eq!(outline[1].level, HeadingLevel::H2);
        assert_eq!(outline[2].page, 2);
    }

    #[test]
    fn deduplicates_across_whole_document() {
        let pages = vec![
            page(1, vec![line("Revision History", 22.0)]),
            page(5, vec![line("REVISION HISTORY", 22.0)]),
        ];
        let outline = extract_headings(&pages, "Untitled", &thresholds());
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].page, 1);
    }

    #[test]
    fn no_duplicate_normalized_texts_property() {
        let pages = vec![page(
            1,
            vec![
                line("Overview", 22.0),
                line("Scope", 22.0),
                line("overview", 22.0),
                line("  Scope ", 22.0),
            ],
        )];
        let outline = extract_headings(&pages, "Untitled", &thresholds());
        let mut keys: Vec<String> = outline.iter().map(|h| normalize_key(&h.text)).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), outline.len());
    }

    #[test]
    fn title_never_appears_in_outline() {
        let pages = vec![page(
            1,
            vec![line("Annual Report 2024", 30.0), line("Overview", 22.0)],
        )];
        let outline = extract_headings(&pages, "Annual Report 2024", &thresholds());
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].text, "Overview ");
    }

    #[test]
    fn table_row_with_bold_large_span_still_excluded() {
        let mut big = span_at("TOTALS", 24.0, 72.0);
        big.flags = FLAG_BOLD;
        let row = Line::new(vec![
            big,
            span_at("12", 12.0, 200.0),
            span_at("34", 12.0, 300.0),
            span_at("46", 12.0, 400.0),
        ]);
        let pages = vec![page(1, vec![row])];
        assert!(extract_headings(&pages, "Untitled", &thresholds()).is_empty());
    }

    #[test]
    fn numbered_form_answers_are_skipped() {
        let pages = vec![page(
            1,
            vec![bold_line("12. Amount of advance required for travel", 12.0)],
        )];
        assert!(extract_headings(&pages, "Untitled", &thresholds()).is_empty());
    }

    #[test]
    fn bold_body_size_line_needs_threshold_or_number() {
        // Bold makes the line a candidate, but body-size unnumbered text
        // still fails level classification.
        let pages = vec![page(1, vec![bold_line("Key takeaway", 12.0)])];
        assert!(extract_headings(&pages, "Untitled", &thresholds()).is_empty());
    }

    #[test]
    fn bold_numbered_line_classifies_by_pattern() {
        let pages = vec![page(1, vec![bold_line("3.2 Risk Register", 12.0)])];
        let outline = extract_headings(&pages, "Untitled", &thresholds());
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].level, HeadingLevel::H2);
    }

    #[test]
    fn uniform_prose_document_yields_empty_outline() {
        // One font size, no bold, plain long sentences: nothing survives the
        // candidate test, so the outline is empty.
        let pages = vec![page(
            1,
            vec![
                line(
                    "this opening paragraph rambles on for considerably more than ten words without stopping",
                    12.0,
                ),
                line(
                    "a second paragraph of equally unremarkable prose follows the first one here as well",
                    12.0,
                ),
            ],
        )];
        let t = FontThresholds {
            body: 12.0,
            h1: 16.2,
            h2: 15.0,
            h3: 13.8,
        };
        assert!(extract_headings(&pages, "Untitled", &t).is_empty());
    }
}
