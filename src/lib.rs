//! # edgequake-pdfsum
//!
//! Summarise a page range of a PDF book with an LLM, falling back to a second
//! provider when the first one fails.
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST / (multipart)
//!  │
//!  ├─ 1. Form     collect document + startPage/stopPage + book metadata
//!  ├─ 2. Extract  parse PDF (spawn_blocking), slice the page window
//!  ├─ 3. Prompt   metadata header + instruction + page text
//!  ├─ 4. Primary  Gemini, reply passed through as-is
//!  ├─ 5. Fallback OpenAI, only if 4 failed; {"summary": …} recovered from reply
//!  └─ 6. Respond  {message, source, summary, tokens?}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfsum::{router, SummarizerConfig, Summarizers};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials are read from GEMINI_API_KEY (or GOOGLE_API_KEY) and
//!     // OPENAI_API_KEY.
//!     let config = SummarizerConfig::default();
//!     let summarizers = Arc::new(Summarizers::from_config(&config));
//!     let app = router(summarizers, config.max_upload_bytes);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` server binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod request;
pub mod server;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{SummarizerConfig, SummarizerConfigBuilder};
pub use error::{ProviderError, SummaryError};
pub use output::{ProviderSummary, SummaryResponse, SummaryResult, SummarySource};
pub use pipeline::extract::{extract_page_range, ExtractedText};
pub use pipeline::llm::{FallbackSummarizer, PrimarySummarizer, ProviderSlot, Summarizer};
pub use prompts::{build_summary_prompt, SummaryPrompt};
pub use request::{BookMetadata, PageRange, SummaryRequest, UploadForm};
pub use server::router;
pub use summarize::{summarize, summarize_prompt, Summarizers};
