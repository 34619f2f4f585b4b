//! Request orchestration: extract, prompt, then walk the fallback ladder.
//!
//! ```text
//! Start ─▶ Extracting ─▶ BuildingPrompt ─▶ TryingPrimary ─┬─▶ Done(Primary)
//!              │                                          └─▶ TryingFallback ─┬─▶ Done(Fallback)
//!              └─▶ Failed (extraction error)                                 └─▶ Failed (exhausted)
//! ```
//!
//! Extraction errors end the request immediately; a bad page range is not a
//! provider problem and another provider would not fix it. Providers are
//! tried one at a time, each exactly once: the fallback runs only after the
//! primary has been observed to fail.

use crate::config::SummarizerConfig;
use crate::error::SummaryError;
use crate::output::SummaryResult;
use crate::pipeline::extract::extract_page_range;
use crate::pipeline::llm::{FallbackSummarizer, PrimarySummarizer, ProviderSlot, Summarizer};
use crate::prompts::{build_summary_prompt, SummaryPrompt};
use crate::request::SummaryRequest;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The two providers, in the order they are tried.
///
/// Constructed once at startup and shared read-only across requests.
#[derive(Clone)]
pub struct Summarizers {
    primary: Arc<dyn Summarizer>,
    fallback: Arc<dyn Summarizer>,
}

impl Summarizers {
    pub fn new(primary: Arc<dyn Summarizer>, fallback: Arc<dyn Summarizer>) -> Self {
        Self { primary, fallback }
    }

    /// Build both provider adapters from configuration.
    ///
    /// Never fails: a provider whose client cannot be constructed (for
    /// example, a missing API key) is logged and fails on first use instead.
    pub fn from_config(config: &SummarizerConfig) -> Self {
        let primary = ProviderSlot::resolve(
            &config.primary_provider,
            &config.primary_model,
            config.primary.as_ref(),
            config,
        );
        let fallback = ProviderSlot::resolve(
            &config.fallback_provider,
            &config.fallback_model,
            config.fallback.as_ref(),
            config,
        );
        info!(
            "Providers: primary {}/{}, fallback {}/{}",
            primary.name(),
            primary.model(),
            fallback.name(),
            fallback.model()
        );

        Self::new(
            Arc::new(PrimarySummarizer::new(primary)),
            Arc::new(FallbackSummarizer::new(fallback)),
        )
    }

    pub fn primary(&self) -> &Arc<dyn Summarizer> {
        &self.primary
    }

    pub fn fallback(&self) -> &Arc<dyn Summarizer> {
        &self.fallback
    }
}

/// Summarize the requested page range of an uploaded PDF.
///
/// # Errors
/// - any extraction error ([`SummaryError::NotAPdf`], [`SummaryError::CorruptPdf`],
///   [`SummaryError::InvalidRange`]) — no provider is called
/// - [`SummaryError::AllProvidersExhausted`] — both providers failed
pub async fn summarize(
    request: &SummaryRequest,
    summarizers: &Summarizers,
) -> Result<SummaryResult, SummaryError> {
    let total_start = Instant::now();
    info!(
        "Summarizing pages {}-{} ({} bytes uploaded)",
        request.range.start,
        request.range.stop,
        request.document.len()
    );

    // ── Step 1: Extract page window ──────────────────────────────────────
    let extracted = extract_page_range(request.document.clone(), request.range).await?;
    if extracted.text.trim().is_empty() {
        warn!(
            "Pages {}-{} yielded no text; prompting with metadata only",
            request.range.start, request.range.stop
        );
    }

    // ── Step 2: Build prompt ─────────────────────────────────────────────
    let prompt = build_summary_prompt(&request.metadata, request.range, &extracted.text);
    debug!("Prompt is {} chars", prompt.as_str().len());

    // ── Step 3: Providers ────────────────────────────────────────────────
    let result = summarize_prompt(&prompt, summarizers).await?;

    info!(
        "Request served by {} in {}ms",
        result.provider,
        total_start.elapsed().as_millis()
    );
    Ok(result)
}

/// Try the primary provider, then the fallback, with an already built prompt.
pub async fn summarize_prompt(
    prompt: &SummaryPrompt,
    summarizers: &Summarizers,
) -> Result<SummaryResult, SummaryError> {
    let primary = &summarizers.primary;
    let primary_err = match primary.summarize(prompt).await {
        Ok(s) => {
            return Ok(SummaryResult {
                summary: s.summary,
                source: primary.source(),
                provider: primary.label().to_string(),
                tokens: None,
            })
        }
        Err(e) => e,
    };

    info!("{} failed, trying {}...", primary.label(), summarizers.fallback.label());

    let fallback = &summarizers.fallback;
    match fallback.summarize(prompt).await {
        Ok(s) => Ok(SummaryResult {
            summary: s.summary,
            source: fallback.source(),
            provider: fallback.label().to_string(),
            tokens: s.tokens,
        }),
        Err(fallback_err) => Err(SummaryError::AllProvidersExhausted {
            primary: primary_err,
            fallback: fallback_err,
        }),
    }
}
