//! Server binary for edgequake-pdfsum.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `SummarizerConfig`, builds the provider clients once, and serves the
//! router until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdfsum::{router, SummarizerConfig, Summarizers};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port (3000)
  pdfsum

  # Different fallback model, shorter per-provider timeout
  pdfsum --fallback-model gpt-4o --api-timeout 30

  # Summarise pages 12-20 of a book
  curl -F document=@book.pdf -F startPage=12 -F stopPage=20 \
       -F bookTitle="Dune" -F bookAuthor="Frank Herbert" http://localhost:3000/

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (primary provider)
  GOOGLE_API_KEY          Used for Gemini when GEMINI_API_KEY is not set
  OPENAI_API_KEY          OpenAI API key (fallback provider)
  RUST_LOG                Overrides the log filter (e.g. edgequake_pdfsum=debug)

A missing key is not fatal: that provider fails on its first call and the
request falls through to the other one.
"#;

/// Summarise PDF page ranges over HTTP with LLM provider fallback.
#[derive(Parser, Debug)]
#[command(
    name = "pdfsum",
    version,
    about = "Summarise PDF page ranges over HTTP with LLM provider fallback",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "PDFSUM_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PDFSUM_PORT", default_value_t = 3000)]
    port: u16,

    /// Primary provider name (tried first).
    #[arg(long, env = "PDFSUM_PRIMARY_PROVIDER", default_value = "gemini")]
    primary_provider: String,

    /// Primary model ID.
    #[arg(long, env = "PDFSUM_PRIMARY_MODEL", default_value = "gemini-pro")]
    primary_model: String,

    /// Fallback provider name (tried only if the primary fails).
    #[arg(long, env = "PDFSUM_FALLBACK_PROVIDER", default_value = "openai")]
    fallback_provider: String,

    /// Fallback model ID.
    #[arg(long, env = "PDFSUM_FALLBACK_MODEL", default_value = "gpt-4")]
    fallback_model: String,

    /// Per-provider call timeout in seconds.
    #[arg(long, env = "PDFSUM_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Largest accepted upload in bytes.
    #[arg(long, env = "PDFSUM_MAX_UPLOAD", default_value_t = 50 * 1024 * 1024)]
    max_upload: usize,

    /// Max completion tokens per provider call.
    #[arg(long, env = "PDFSUM_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDFSUM_TEMPERATURE")]
    temperature: Option<f32>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSUM_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFSUM_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config + providers ─────────────────────────────────────────
    let config = build_config(&cli)?;
    let summarizers = Arc::new(Summarizers::from_config(&config));
    let app = router(summarizers, config.max_upload_bytes);

    // ── Serve ────────────────────────────────────────────────────────────
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.host, cli.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server is running on http://{}", addr);
    info!("API description available at http://{}/api-docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Map CLI flags onto the library config.
fn build_config(cli: &Cli) -> Result<SummarizerConfig> {
    let mut builder = SummarizerConfig::builder()
        .primary_provider(&cli.primary_provider)
        .primary_model(&cli.primary_model)
        .fallback_provider(&cli.fallback_provider)
        .fallback_model(&cli.fallback_model)
        .api_timeout_secs(cli.api_timeout)
        .max_upload_bytes(cli.max_upload);

    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
