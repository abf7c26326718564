//! Title selection over the first pages of a document.

use crate::types::Page;

/// Sentinel title used when no line qualifies.
pub const UNTITLED: &str = "Untitled";

/// Title candidates are only sought on the first three pages.
const TITLE_PAGE_LIMIT: usize = 3;

/// Pick the document title from the first pages' lines.
///
/// A line qualifies as a candidate when its cleaned length is strictly
/// between 10 and 150 characters, its mean span size exceeds 10 points, and
/// it does not start with the token "page" (running headers). The candidate
/// with the largest mean size wins; pages are scanned in order, so on a size
/// tie the earliest page keeps the slot.
pub fn extract_title(pages: &[Page]) -> String {
    let mut best: Option<(String, f32)> = None;

    for page in pages.iter().take(TITLE_PAGE_LIMIT) {
        for line in page.lines() {
            let text = line.text();
            if text.is_empty() {
                continue;
            }
            let Some(size) = line.mean_size() else {
                continue;
            };

            let len = text.chars().count();
            if len <= 10 || len >= 150 {
                continue;
            }
            if size <= 10.0 {
                continue;
            }
            if text.to_lowercase().starts_with("page") {
                continue;
            }

            match &best {
                Some((_, best_size)) if size <= *best_size => {}
                _ => best = Some((text, size)),
            }
        }
    }

    best.map(|(text, _)| text)
        .unwrap_or_else(|| UNTITLED.to_string())
}
