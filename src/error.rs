//! Error types for the edgequake-pdfsum library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummaryError`] — **Fatal**: the request cannot be answered at all
//!   (missing form field, not a PDF, bad page range, every provider down).
//!   Returned as `Err(SummaryError)` from [`crate::summarize::summarize`].
//!
//! * [`ProviderError`] — **Non-fatal**: one provider could not produce a
//!   usable summary (transport failure, timeout, reply without JSON). The
//!   orchestrator treats it as "try the next provider" and only escalates
//!   once every provider has reported one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdfsum library.
///
/// Per-provider failures use [`ProviderError`] and are only surfaced here,
/// bundled, when every provider has failed.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Request errors ────────────────────────────────────────────────────
    /// A required form field was absent or empty.
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A form field was present but could not be interpreted.
    #[error("Invalid value {value:?} for field '{field}'")]
    InvalidField { field: &'static str, value: String },

    /// The upload carried no document part.
    #[error("No document was uploaded")]
    MissingDocument,

    /// The multipart body could not be read.
    #[error("Malformed upload: {detail}")]
    MalformedUpload { detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The uploaded bytes are not a PDF.
    #[error("Uploaded file is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// The requested page window does not fit the document.
    #[error("Invalid page range {start}-{stop} (document has {total} pages)")]
    InvalidRange {
        start: usize,
        stop: usize,
        total: usize,
    },

    // ── Provider errors ───────────────────────────────────────────────────
    /// Primary and fallback providers both failed.
    #[error("All providers failed.\nPrimary: {primary}\nFallback: {fallback}")]
    AllProvidersExhausted {
        primary: ProviderError,
        fallback: ProviderError,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SummaryError {
    /// True when the caller supplied a request the server must reject up front.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, SummaryError::MissingField { .. })
    }

    /// True when extraction succeeded but no provider produced a summary.
    pub fn is_provider_exhaustion(&self) -> bool {
        matches!(self, SummaryError::AllProvidersExhausted { .. })
    }
}

/// Why a single provider did not yield a summary.
///
/// Returned as the `Err` arm of each summarizer's result so the orchestrator
/// can move on to the next provider instead of unwinding the request.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProviderError {
    /// The provider client could not be constructed at startup.
    #[error("provider '{provider}' is not configured: {hint}")]
    NotConfigured { provider: String, hint: String },

    /// The call did not complete within the configured timeout.
    #[error("provider '{provider}' timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    /// Transport, authentication or remote-side failure.
    #[error("provider '{provider}' returned an error: {detail}")]
    Api { provider: String, detail: String },

    /// The reply contained no `{ … }` object.
    #[error("no JSON object found in reply")]
    NoJsonFound,

    /// The `{ … }` span did not parse as JSON.
    #[error("reply JSON is malformed: {detail}")]
    MalformedJson { detail: String },

    /// The JSON object has no string `summary` member.
    #[error("reply JSON has no \"summary\" string")]
    MissingSummaryKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_range_display() {
        let e = SummaryError::InvalidRange {
            start: 5,
            stop: 3,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("5-3"), "got: {msg}");
        assert!(msg.contains("10 pages"), "got: {msg}");
    }

    #[test]
    fn exhaustion_lists_both_causes() {
        let e = SummaryError::AllProvidersExhausted {
            primary: ProviderError::Timeout {
                provider: "gemini".into(),
                secs: 60,
            },
            fallback: ProviderError::NoJsonFound,
        };
        let msg = e.to_string();
        assert!(msg.contains("gemini"));
        assert!(msg.contains("60s"));
        assert!(msg.contains("no JSON object"));
        assert!(e.is_provider_exhaustion());
        assert!(!e.is_missing_field());
    }

    #[test]
    fn missing_field_display() {
        let e = SummaryError::MissingField { field: "startPage" };
        assert!(e.to_string().contains("startPage"));
        assert!(e.is_missing_field());
    }

    #[test]
    fn provider_error_serialises_with_variant_tag() {
        let e = ProviderError::Api {
            provider: "openai".into(),
            detail: "401 Unauthorized".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("Api"), "got: {json}");
        assert!(json.contains("401"), "got: {json}");
    }
}
