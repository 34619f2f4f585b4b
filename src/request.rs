//! Request model: what a single upload asks the service to do.
//!
//! An upload arrives as loosely-typed multipart text fields plus one file
//! part. [`UploadForm`] collects those parts as they stream in; calling
//! [`UploadForm::into_request`] validates them into a [`SummaryRequest`].
//! Page-bound checks against the document itself happen later, in the
//! extractor, because the page count is only known after parsing.

use crate::error::SummaryError;
use axum::body::Bytes;
use serde::{Deserialize, Serialize};

/// Name of the multipart file part carrying the PDF.
pub const DOCUMENT_FIELD: &str = "document";

/// A 1-indexed, inclusive page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: usize,
    pub stop: usize,
}

impl PageRange {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Check the window against a document of `total` pages.
    pub fn validate(&self, total: usize) -> Result<(), SummaryError> {
        if self.start < 1 || self.stop > total || self.start > self.stop {
            return Err(SummaryError::InvalidRange {
                start: self.start,
                stop: self.stop,
                total,
            });
        }
        Ok(())
    }
}

/// Free-form book metadata woven into the prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub genre: Option<String>,
}

/// One summarization request. Lives for the duration of a single HTTP call.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub document: Bytes,
    pub range: PageRange,
    pub metadata: BookMetadata,
}

/// Multipart parts collected from an upload, before validation.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub document: Option<Bytes>,
    pub start_page: Option<String>,
    pub stop_page: Option<String>,
    pub book_title: Option<String>,
    pub book_author: Option<String>,
    pub book_subject: Option<String>,
    pub genre: Option<String>,
}

impl UploadForm {
    /// Record a text part. Unknown field names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "startPage" => &mut self.start_page,
            "stopPage" => &mut self.stop_page,
            "bookTitle" => &mut self.book_title,
            "bookAuthor" => &mut self.book_author,
            "bookSubject" => &mut self.book_subject,
            "genre" => &mut self.genre,
            _ => return,
        };
        *slot = Some(value);
    }

    /// Validate the collected parts.
    ///
    /// Page fields are checked first so a request lacking them is rejected
    /// before anything else is looked at.
    pub fn into_request(self) -> Result<SummaryRequest, SummaryError> {
        let start_raw = required(self.start_page, "startPage")?;
        let stop_raw = required(self.stop_page, "stopPage")?;

        let start = parse_page(&start_raw, "startPage")?;
        let stop = parse_page(&stop_raw, "stopPage")?;

        let document = self.document.ok_or(SummaryError::MissingDocument)?;

        Ok(SummaryRequest {
            document,
            range: PageRange::new(start, stop),
            metadata: BookMetadata {
                title: self.book_title,
                author: self.book_author,
                subject: self.book_subject,
                genre: self.genre,
            },
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, SummaryError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SummaryError::MissingField { field }),
    }
}

fn parse_page(raw: &str, field: &'static str) -> Result<usize, SummaryError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| SummaryError::InvalidField {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(start: Option<&str>, stop: Option<&str>) -> UploadForm {
        let mut f = UploadForm {
            document: Some(Bytes::from_static(b"%PDF-1.5")),
            ..Default::default()
        };
        if let Some(s) = start {
            f.set_text("startPage", s.to_string());
        }
        if let Some(s) = stop {
            f.set_text("stopPage", s.to_string());
        }
        f
    }

    #[test]
    fn range_validation() {
        assert!(PageRange::new(2, 4).validate(10).is_ok());
        assert!(PageRange::new(1, 10).validate(10).is_ok());
        assert!(PageRange::new(3, 3).validate(3).is_ok());
        assert!(PageRange::new(0, 3).validate(10).is_err());
        assert!(PageRange::new(5, 3).validate(10).is_err());
        assert!(PageRange::new(2, 11).validate(10).is_err());
    }

    #[test]
    fn missing_start_page_is_rejected_first() {
        let mut f = form(None, Some("4"));
        f.document = None;
        match f.into_request() {
            Err(SummaryError::MissingField { field }) => assert_eq!(field, "startPage"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn blank_stop_page_counts_as_missing() {
        let err = form(Some("2"), Some("  ")).into_request().unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn non_numeric_page_is_invalid() {
        match form(Some("two"), Some("4")).into_request() {
            Err(SummaryError::InvalidField { field, value }) => {
                assert_eq!(field, "startPage");
                assert_eq!(value, "two");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn missing_document_after_valid_pages() {
        let mut f = form(Some("2"), Some("4"));
        f.document = None;
        assert!(matches!(
            f.into_request(),
            Err(SummaryError::MissingDocument)
        ));
    }

    #[test]
    fn metadata_is_carried_through() {
        let mut f = form(Some(" 2 "), Some("4"));
        f.set_text("bookTitle", "Dune".into());
        f.set_text("genre", "Science fiction".into());
        f.set_text("somethingElse", "ignored".into());

        let req = f.into_request().unwrap();
        assert_eq!(req.range, PageRange::new(2, 4));
        assert_eq!(req.metadata.title.as_deref(), Some("Dune"));
        assert_eq!(req.metadata.genre.as_deref(), Some("Science fiction"));
        assert_eq!(req.metadata.author, None);
    }
}
