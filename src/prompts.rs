//! Prompt construction for page-range summaries.
//!
//! All prompt wording lives here so it can be inspected in unit tests without
//! a live provider, and changed in one place.

use crate::request::{BookMetadata, PageRange};
use std::fmt;

/// Instruction placed between the metadata header and the page text.
///
/// `{start}` and `{stop}` are substituted with the requested page bounds.
pub const SUMMARY_INSTRUCTION: &str = r#"Please summarize the following text and return the summary as a JSON object with a "summary" key (summary should be at least 300 words long and note what is provided is not the full book; you are simply summarizing between a page range. In the summary text, mention the page range, e.g., "from page {start} to page {stop}, here is the summary"):"#;

/// A fully rendered prompt. Built once per request and handed to whichever
/// summarizer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt(String);

impl SummaryPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SummaryPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render the summarization prompt.
///
/// Missing metadata is written as an empty value after its label; the model
/// copes and the header layout stays fixed.
pub fn build_summary_prompt(
    metadata: &BookMetadata,
    range: PageRange,
    extracted_text: &str,
) -> SummaryPrompt {
    let field = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
    let instruction = SUMMARY_INSTRUCTION
        .replace("{start}", &range.start.to_string())
        .replace("{stop}", &range.stop.to_string());

    SummaryPrompt(format!(
        "Book Title: {title}\n\
         Book Author: {author}\n\
         Book Subject: {subject}\n\
         Genre: {genre}\n\
         Start Page: {start}\n\
         End Page: {stop}\n\
         \n\
         {instruction}\n\
         \n\
         {extracted_text}\n",
        title = field(&metadata.title),
        author = field(&metadata.author),
        subject = field(&metadata.subject),
        genre = field(&metadata.genre),
        start = range.start,
        stop = range.stop,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> BookMetadata {
        BookMetadata {
            title: Some("Dune".into()),
            author: Some("Frank Herbert".into()),
            subject: Some("Ecology".into()),
            genre: Some("Science fiction".into()),
        }
    }

    #[test]
    fn prompt_contains_bounds_and_text_verbatim() {
        let text = "The spice must flow.\nFear is the mind-killer.";
        let p = build_summary_prompt(&dune(), PageRange::new(12, 37), text);
        let s = p.as_str();
        assert!(s.contains("Start Page: 12"));
        assert!(s.contains("End Page: 37"));
        assert!(s.contains("from page 12 to page 37"));
        assert!(s.contains(text));
    }

    #[test]
    fn prompt_states_output_contract() {
        let p = build_summary_prompt(&dune(), PageRange::new(1, 2), "x");
        let s = p.as_str();
        assert!(s.contains("300 words"));
        assert!(s.contains(r#""summary" key"#));
        assert!(s.contains("not the full book"));
        assert!(s.contains("Book Author: Frank Herbert"));
    }

    #[test]
    fn absent_metadata_leaves_labels_empty() {
        let p = build_summary_prompt(&BookMetadata::default(), PageRange::new(1, 1), "body");
        assert!(p.as_str().starts_with("Book Title: \nBook Author: \n"));
        assert!(p.as_str().contains("Genre: \n"));
    }

    #[test]
    fn braces_in_text_survive() {
        let text = "fn main() { println!(\"{}\", 1); }";
        let p = build_summary_prompt(&dune(), PageRange::new(3, 4), text);
        assert!(p.to_string().contains(text));
    }
}
