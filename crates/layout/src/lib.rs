//! PDF text-layout collaborator.
//!
//! This crate is the impure half of the pipeline: it opens PDF bytes with
//! `lopdf`, interprets each page's content stream into positioned spans, and
//! assembles the block/line/span tree that `outline_core` consumes. It also
//! hosts the per-document orchestrator, [`extract_outline`].
//!
//! ```text
//! bytes  ->  LopdfBackend  ->  Span[] per page  ->  Page[]  ->  Extraction
//!              (backend)        (content)         (assemble)
//! ```

use thiserror::Error;

use outline_core::{Extraction, Page};

pub mod assemble;
pub mod backend;
pub mod content;
pub mod scrub;

use backend::{LopdfBackend, PdfBackend};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("document is encrypted")]
    Encrypted,
}

/// Extract and assemble every page of an opened document.
///
/// A failure on a single page never aborts the document: the page simply
/// contributes no spans, and the failure is logged at debug level.
pub fn extract_pages(backend: &dyn PdfBackend) -> Vec<Page> {
    let page_map = backend.pages();
    let mut pages = Vec::with_capacity(page_map.len());

    for (&page_num, &page_id) in &page_map {
        let spans = match content::extract_page_spans(backend, page_id) {
            Ok(spans) => spans,
            Err(e) => {
                log::debug!("page {page_num}: content extraction failed: {e}");
                Vec::new()
            }
        };
        pages.push(assemble::page_from_spans(page_num, spans));
    }

    pages
}

/// Parse PDF bytes into assembled pages.
pub fn parse_pages(bytes: &[u8]) -> Result<Vec<Page>, LayoutError> {
    let backend = LopdfBackend::load_bytes(bytes)?;
    Ok(extract_pages(&backend))
}

/// Process one document end to end.
///
/// An unreadable document degrades to [`Extraction::ParseFailure`] rather
/// than an error; a document with zero pages is reported as
/// [`Extraction::EmptyDocument`]. Both still produce well-defined JSON
/// through [`Extraction::into_result`], so batch callers never abort.
pub fn extract_outline(bytes: &[u8]) -> Extraction {
    let backend = match LopdfBackend::load_bytes(bytes) {
        Ok(backend) => backend,
        Err(e) => return Extraction::ParseFailure(e.to_string()),
    };

    if backend.page_count() == 0 {
        return Extraction::EmptyDocument;
    }

    let pages = extract_pages(&backend);
    Extraction::Success(outline_core::extract(&pages))
}
