//! Provider interaction: send the prompt, normalise the reply.
//!
//! Two adapters share one call path ([`ProviderSlot::complete`]) and differ
//! only in how they read the reply:
//!
//! * [`PrimarySummarizer`] passes the reply text through unchanged.
//! * [`FallbackSummarizer`] digs a `{"summary": …}` object out of the reply
//!   (see [`crate::pipeline::recover`]) and reports token usage.
//!
//! Neither adapter retries or propagates faults. Every failure is logged and
//! returned as a [`ProviderError`] so the orchestrator can move on.

use crate::config::SummarizerConfig;
use crate::error::ProviderError;
use crate::output::{ProviderSummary, SummarySource};
use crate::pipeline::recover::recover_summary;
use crate::prompts::SummaryPrompt;
use async_trait::async_trait;
use edgequake_llm::{
    ChatMessage, CompletionOptions, GeminiProvider, LLMProvider, LlmError, ProviderFactory,
};
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// One rung of the fallback ladder.
///
/// Implemented by the two provider adapters; tests substitute scripted
/// implementations to observe call order.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Position in the fallback ladder.
    fn source(&self) -> SummarySource;

    /// Display name reported to clients, e.g. "Gemini".
    fn label(&self) -> &str;

    /// Produce a summary, or explain why this provider could not.
    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<ProviderSummary, ProviderError>;
}

/// A provider client plus the settings used to call it.
///
/// Built once at startup. A provider that failed to construct keeps the
/// construction error and fails on first use.
pub struct ProviderSlot {
    name: String,
    model: String,
    provider: Result<Arc<dyn LLMProvider>, String>,
    timeout_secs: u64,
    options: Option<CompletionOptions>,
}

impl ProviderSlot {
    /// Resolve a provider by name, or use the pre-built one when given.
    pub fn resolve(
        name: &str,
        model: &str,
        prebuilt: Option<&Arc<dyn LLMProvider>>,
        config: &SummarizerConfig,
    ) -> Self {
        let provider = match prebuilt {
            Some(p) => Ok(Arc::clone(p)),
            None => create_provider(name, model).map_err(|e| {
                warn!(
                    "Provider '{}' ({}) unavailable at startup: {}",
                    name, model, e
                );
                e.to_string()
            }),
        };

        Self {
            name: name.to_string(),
            model: model.to_string(),
            provider,
            timeout_secs: config.api_timeout_secs,
            options: build_options(config),
        }
    }

    /// A slot whose provider could not be built.
    pub fn unconfigured(name: &str, model: &str, hint: &str, timeout_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            model: model.to_string(),
            provider: Err(hint.to_string()),
            timeout_secs,
            options: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `prompt` as a single user message and wait for one completion.
    ///
    /// Returns the reply text and the total tokens billed.
    async fn complete(&self, prompt: &SummaryPrompt) -> Result<(String, usize), ProviderError> {
        let provider = self
            .provider
            .as_ref()
            .map_err(|hint| ProviderError::NotConfigured {
                provider: self.name.clone(),
                hint: hint.clone(),
            })?;

        let messages = vec![ChatMessage::user(prompt.as_str())];
        let start = Instant::now();

        let call = provider.chat(&messages, self.options.as_ref());
        let response = match timeout(Duration::from_secs(self.timeout_secs), call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(ProviderError::Api {
                    provider: self.name.clone(),
                    detail: e.to_string(),
                })
            }
            Err(_) => {
                return Err(ProviderError::Timeout {
                    provider: self.name.clone(),
                    secs: self.timeout_secs,
                })
            }
        };

        debug!(
            "{}/{}: {} input tokens, {} output tokens, {} total, {:?}",
            self.name,
            self.model,
            response.prompt_tokens,
            response.completion_tokens,
            response.total_tokens,
            start.elapsed()
        );

        Ok((response.content, response.total_tokens))
    }
}

/// Build a named provider through the factory.
///
/// Gemini also accepts its key from `GOOGLE_API_KEY` when `GEMINI_API_KEY`
/// is unset; the factory alone only reads the latter.
fn create_provider(name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, LlmError> {
    let key = google_api_key(
        name,
        model,
        env::var("GEMINI_API_KEY").ok(),
        env::var("GOOGLE_API_KEY").ok(),
    );
    if let Some(key) = key {
        info!("Provider '{}': using key from GOOGLE_API_KEY", name);
        return Ok(Arc::new(GeminiProvider::new(key).with_model(model)));
    }
    ProviderFactory::create_llm_provider(name, model)
}

/// The `GOOGLE_API_KEY` value to use for a Google AI Gemini provider, if
/// `GEMINI_API_KEY` is not set.
fn google_api_key(
    name: &str,
    model: &str,
    gemini_key: Option<String>,
    google_key: Option<String>,
) -> Option<String> {
    let google_ai = matches!(name.to_ascii_lowercase().as_str(), "gemini" | "google")
        && !model.starts_with("vertexai:");
    if !google_ai || gemini_key.is_some_and(|k| !k.is_empty()) {
        return None;
    }
    google_key.filter(|k| !k.is_empty())
}

/// Build `CompletionOptions` from the config, if any option is set.
fn build_options(config: &SummarizerConfig) -> Option<CompletionOptions> {
    if config.temperature.is_none() && config.max_tokens.is_none() {
        return None;
    }
    Some(CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    })
}

/// Human-facing provider name for the response `source` field.
pub fn display_name(provider: &str) -> String {
    match provider.to_ascii_lowercase().as_str() {
        "gemini" | "google" | "vertexai" => "Gemini".to_string(),
        "openai" | "azure" => "OpenAI".to_string(),
        "anthropic" => "Anthropic".to_string(),
        "ollama" => "Ollama".to_string(),
        _ => provider.to_string(),
    }
}

// ── Primary ──────────────────────────────────────────────────────────────

/// First attempt. Returns the model's text as-is.
///
/// The prompt asks for JSON, but the reply is not parsed here; clients of
/// the primary path receive whatever the model wrote.
pub struct PrimarySummarizer {
    slot: ProviderSlot,
    label: String,
}

impl PrimarySummarizer {
    pub fn new(slot: ProviderSlot) -> Self {
        let label = display_name(slot.name());
        Self { slot, label }
    }
}

#[async_trait]
impl Summarizer for PrimarySummarizer {
    fn source(&self) -> SummarySource {
        SummarySource::Primary
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<ProviderSummary, ProviderError> {
        match self.slot.complete(prompt).await {
            Ok((text, _tokens)) => {
                info!("Summary generation successful with {}", self.label);
                Ok(ProviderSummary {
                    summary: text,
                    tokens: None,
                })
            }
            Err(e) => {
                warn!("Error generating summary with {}: {}", self.label, e);
                Err(e)
            }
        }
    }
}

// ── Fallback ─────────────────────────────────────────────────────────────

/// Second attempt. Requires a `{"summary": …}` object in the reply.
pub struct FallbackSummarizer {
    slot: ProviderSlot,
    label: String,
}

impl FallbackSummarizer {
    pub fn new(slot: ProviderSlot) -> Self {
        let label = display_name(slot.name());
        Self { slot, label }
    }
}

/// Turn a fallback reply into a summary, keeping the token count.
pub fn parse_fallback_reply(reply: &str, tokens: usize) -> Result<ProviderSummary, ProviderError> {
    let summary = recover_summary(reply)?;
    Ok(ProviderSummary {
        summary,
        tokens: Some(tokens),
    })
}

#[async_trait]
impl Summarizer for FallbackSummarizer {
    fn source(&self) -> SummarySource {
        SummarySource::Fallback
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn summarize(&self, prompt: &SummaryPrompt) -> Result<ProviderSummary, ProviderError> {
        let outcome = self
            .slot
            .complete(prompt)
            .await
            .and_then(|(reply, tokens)| parse_fallback_reply(&reply, tokens));

        match outcome {
            Ok(summary) => {
                info!(
                    "Summary generation successful with {} ({} tokens)",
                    self.label,
                    summary.tokens.unwrap_or(0)
                );
                Ok(summary)
            }
            Err(e) => {
                warn!("Error generating summary with {}: {}", self.label, e);
                Err(e)
            }
        }
    }
}
