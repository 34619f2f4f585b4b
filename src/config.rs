//! Configuration types for the summarization service.
//!
//! Everything the server needs to know at startup lives in
//! [`SummarizerConfig`], built via its [`SummarizerConfigBuilder`]. The
//! config is read once, turned into provider clients by
//! [`crate::summarize::Summarizers::from_config`], and never mutated again.

use crate::error::SummaryError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Default primary provider name understood by `ProviderFactory`.
pub const DEFAULT_PRIMARY_PROVIDER: &str = "gemini";
/// Default primary model.
pub const DEFAULT_PRIMARY_MODEL: &str = "gemini-pro";
/// Default fallback provider name understood by `ProviderFactory`.
pub const DEFAULT_FALLBACK_PROVIDER: &str = "openai";
/// Default fallback model.
pub const DEFAULT_FALLBACK_MODEL: &str = "gpt-4";

/// Configuration for the summarization pipeline and its HTTP surface.
///
/// # Example
/// ```rust
/// use edgequake_pdfsum::SummarizerConfig;
///
/// let config = SummarizerConfig::builder()
///     .fallback_model("gpt-4o")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.primary_model, "gemini-pro");
/// ```
#[derive(Clone)]
pub struct SummarizerConfig {
    /// Provider name for the first attempt, e.g. "gemini".
    pub primary_provider: String,

    /// Model identifier for the first attempt. Default: `gemini-pro`.
    pub primary_model: String,

    /// Provider name tried only after the primary fails, e.g. "openai".
    pub fallback_provider: String,

    /// Model identifier for the fallback attempt. Default: `gpt-4`.
    pub fallback_model: String,

    /// Pre-constructed primary provider. Takes precedence over the name.
    pub primary: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed fallback provider. Takes precedence over the name.
    pub fallback: Option<Arc<dyn LLMProvider>>,

    /// Per-provider-call timeout in seconds. Default: 60.
    ///
    /// A call that exceeds it counts as a provider failure, so a hung
    /// primary still leaves time for the fallback.
    pub api_timeout_secs: u64,

    /// Largest accepted upload body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Optional cap on completion tokens. Default: provider default.
    pub max_tokens: Option<usize>,

    /// Optional sampling temperature. Default: provider default.
    pub temperature: Option<f32>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            primary_provider: DEFAULT_PRIMARY_PROVIDER.to_string(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_provider: DEFAULT_FALLBACK_PROVIDER.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            primary: None,
            fallback: None,
            api_timeout_secs: 60,
            max_upload_bytes: 50 * 1024 * 1024,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl fmt::Debug for SummarizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizerConfig")
            .field("primary_provider", &self.primary_provider)
            .field("primary_model", &self.primary_model)
            .field("fallback_provider", &self.fallback_provider)
            .field("fallback_model", &self.fallback_model)
            .field("primary", &self.primary.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("fallback", &self.fallback.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug)]
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl SummarizerConfigBuilder {
    pub fn primary_provider(mut self, name: impl Into<String>) -> Self {
        self.config.primary_provider = name.into();
        self
    }

    pub fn primary_model(mut self, model: impl Into<String>) -> Self {
        self.config.primary_model = model.into();
        self
    }

    pub fn fallback_provider(mut self, name: impl Into<String>) -> Self {
        self.config.fallback_provider = name.into();
        self
    }

    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.config.fallback_model = model.into();
        self
    }

    pub fn primary(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.primary = Some(provider);
        self
    }

    pub fn fallback(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.fallback = Some(provider);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummaryError> {
        let c = &self.config;
        for (label, value) in [
            ("primary provider", &c.primary_provider),
            ("primary model", &c.primary_model),
            ("fallback provider", &c.fallback_provider),
            ("fallback model", &c.fallback_model),
        ] {
            if value.trim().is_empty() {
                return Err(SummaryError::InvalidConfig(format!(
                    "{label} must not be empty"
                )));
            }
        }
        if c.api_timeout_secs == 0 {
            return Err(SummaryError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_upload_bytes < 1024 {
            return Err(SummaryError::InvalidConfig(format!(
                "Upload limit must be ≥ 1024 bytes, got {}",
                c.max_upload_bytes
            )));
        }
        if let Some(t) = c.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(SummaryError::InvalidConfig(format!(
                    "Temperature must be 0.0–2.0, got {t}"
                )));
            }
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_models() {
        let c = SummarizerConfig::builder().build().unwrap();
        assert_eq!(c.primary_provider, "gemini");
        assert_eq!(c.primary_model, "gemini-pro");
        assert_eq!(c.fallback_provider, "openai");
        assert_eq!(c.fallback_model, "gpt-4");
        assert_eq!(c.api_timeout_secs, 60);
        assert!(c.max_tokens.is_none());
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = SummarizerConfig::builder()
            .api_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn empty_model_rejected() {
        let err = SummarizerConfig::builder()
            .fallback_model(" ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("fallback model"));
    }

    #[test]
    fn out_of_range_temperature_rejected() {
        assert!(SummarizerConfig::builder().temperature(2.5).build().is_err());
        assert!(SummarizerConfig::builder().temperature(0.3).build().is_ok());
    }

    #[test]
    fn tiny_upload_limit_rejected() {
        assert!(SummarizerConfig::builder()
            .max_upload_bytes(10)
            .build()
            .is_err());
    }

    #[test]
    fn debug_hides_provider_objects() {
        let dbg = format!("{:?}", SummarizerConfig::default());
        assert!(dbg.contains("gemini-pro"));
        assert!(dbg.contains("primary: None"));
    }
}
