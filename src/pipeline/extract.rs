//! Page-range text extraction.
//!
//! ## Pages as blank-line blocks
//!
//! Text is pulled out page by page and flattened so that each page is one
//! block and blocks are separated by an empty line. The requested 1-indexed
//! window `[start, stop]` then selects blocks `start-1..stop`. The page
//! *count* used for validation is the document's real count.
//!
//! ## Why spawn_blocking?
//!
//! Parsing and text extraction are CPU-bound and synchronous. Running them
//! on the blocking pool keeps Tokio worker threads free for other requests.

use crate::error::SummaryError;
use crate::request::PageRange;
use axum::body::Bytes;
use pdf_extract::Document;
use std::panic;
use tracing::{debug, warn};

/// Separator treated as a page boundary in the flattened text.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Text selected from a document by page range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    /// Real page count of the source document.
    pub total_pages: usize,
}

/// Flattened text and page count of a parsed PDF.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub total_pages: usize,
    pub text: String,
}

/// Parse `bytes` and return the text of the requested page window.
///
/// # Errors
/// - [`SummaryError::NotAPdf`] / [`SummaryError::CorruptPdf`] when the bytes
///   cannot be loaded
/// - [`SummaryError::InvalidRange`] when `range` does not fit the document
pub async fn extract_page_range(
    bytes: Bytes,
    range: PageRange,
) -> Result<ExtractedText, SummaryError> {
    let parsed = tokio::task::spawn_blocking(move || parse_document(&bytes))
        .await
        .map_err(|e| SummaryError::Internal(format!("Extraction task panicked: {}", e)))??;

    let text = select_page_range(&parsed.text, parsed.total_pages, range)?;
    debug!(
        "Extracted {} chars from pages {}-{} of {}",
        text.len(),
        range.start,
        range.stop,
        parsed.total_pages
    );

    Ok(ExtractedText {
        text,
        total_pages: parsed.total_pages,
    })
}

/// Blocking PDF parse: page count plus flattened text.
pub fn parse_document(bytes: &[u8]) -> Result<ParsedDocument, SummaryError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(SummaryError::NotAPdf { magic });
    }

    let document = Document::load_mem(bytes).map_err(|e| SummaryError::CorruptPdf {
        detail: e.to_string(),
    })?;
    let total_pages = document.get_pages().len();

    // pdf-extract gives the best reading order but panics on some fonts.
    let by_pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));
    let pages = match by_pages {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            warn!("pdf-extract failed, falling back to per-page extraction: {}", e);
            extract_per_page(&document)
        }
        Err(_) => {
            warn!("pdf-extract panicked, falling back to per-page extraction");
            extract_per_page(&document)
        }
    };

    Ok(ParsedDocument {
        total_pages,
        text: join_pages(&pages),
    })
}

/// Per-page extraction via lopdf. A page that fails yields an empty string
/// so later pages keep their position.
fn extract_per_page(document: &Document) -> Vec<String> {
    document
        .get_pages()
        .keys()
        .map(|&page_num| {
            document.extract_text(&[page_num]).unwrap_or_else(|e| {
                warn!("Page {}: text extraction failed: {}", page_num, e);
                String::new()
            })
        })
        .collect()
}

/// Flatten pages into exactly one block each.
///
/// Blank lines inside a page are dropped, so the only blank lines left in
/// the result are the separators between pages.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| {
            page.lines()
                .map(str::trim_end)
                .filter(|line| !line.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Select blocks `[start-1, stop)` from the flattened text and join them
/// with single newlines.
///
/// The range is validated against `total_pages`, the document's real page
/// count. When the text has fewer blocks than pages the selection is clipped,
/// possibly to nothing.
pub fn select_page_range(
    text: &str,
    total_pages: usize,
    range: PageRange,
) -> Result<String, SummaryError> {
    range.validate(total_pages)?;

    let blocks: Vec<&str> = text.split(BLOCK_SEPARATOR).collect();
    let start = (range.start - 1).min(blocks.len());
    let stop = range.stop.min(blocks.len());

    Ok(blocks[start..stop].join("\n"))
}
