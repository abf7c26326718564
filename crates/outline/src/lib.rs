//! Functional core for PDF outline extraction.
//!
//! This crate holds the pure half of the pipeline: given pages of
//! block/line/span layout data (produced elsewhere, by the `layout` crate),
//! it infers a document title and an ordered H1/H2/H3 outline from visual
//! cues alone -- font sizes, boldness, numbering patterns, and positional
//! layout. It performs no I/O and knows nothing about the PDF format.
//!
//! # Pipeline
//!
//! ```text
//! Page[]  ->  FontThresholds      (fonts::analyze_font_sizes)
//!         ->  title: String       (title::extract_title, first 3 pages)
//!         ->  Vec<HeadingRecord>  (headings::extract_headings)
//!         ->  ExtractionResult
//! ```
//!
//! Each stage is a pure function over explicit inputs; documents share no
//! state, so callers may process any number of documents independently.

pub mod fonts;
pub mod headings;
pub mod text;
pub mod title;
pub mod types;

pub use types::*;

/// Run the full heuristic pipeline over a document's pages.
///
/// The caller is responsible for the degenerate cases that precede layout
/// analysis (unreadable file, zero pages); see [`Extraction`]. A document
/// whose pages contain no text at all still gets a title sentinel and an
/// empty outline -- absent font statistics mean no headings are producible.
pub fn extract(pages: &[Page]) -> ExtractionResult {
    let title = title::extract_title(pages);
    let outline = match fonts::analyze_font_sizes(pages) {
        Some(thresholds) => headings::extract_headings(pages, &title, &thresholds),
        None => Vec::new(),
    };
    ExtractionResult { title, outline }
}
