//! Output types: what a successful summarization returns.

use serde::{Deserialize, Serialize};

/// Message returned alongside every successful summary.
pub const SUCCESS_MESSAGE: &str = "Summary generated";

/// Which rung of the fallback ladder produced the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    Primary,
    Fallback,
}

/// What one summarizer hands back when it succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub summary: String,
    /// Total tokens billed for the call, when the summarizer reports it.
    pub tokens: Option<usize>,
}

/// Final result of [`crate::summarize::summarize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub source: SummarySource,
    /// Display name of the provider that answered, e.g. "Gemini".
    pub provider: String,
    /// Present only when the fallback provider answered.
    pub tokens: Option<usize>,
}

/// JSON body of a `200 OK` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub message: String,
    pub source: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<usize>,
}

impl From<SummaryResult> for SummaryResponse {
    fn from(result: SummaryResult) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            source: result.provider,
            summary: result.summary,
            tokens: result.tokens,
        }
    }
}
