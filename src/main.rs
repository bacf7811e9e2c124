//! # MR News Digest
//!
//! Builds a daily market-research news digest from a fixed list of RSS/Atom
//! feeds and writes it as one JSON document for a static dashboard.
//!
//! ## Usage
//!
//! ```sh
//! mr_news_digest -o data/news.json
//! OPENAI_API_KEY=sk-... mr_news_digest -c config.yaml
//! ```
//!
//! ## Architecture
//!
//! 1. **Collect**: fetch each feed in turn; a failing feed is skipped
//! 2. **Select**: normalize, deduplicate by link, newest first, relevance gate
//! 3. **Enrich**: summarize (local or backend, 12 at a time) and tag topics
//! 4. **Assemble**: top news, funding/M&A, hashtags, ticker
//! 5. **Output**: atomically replace the JSON document

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod assemble;
mod classify;
mod cli;
mod config;
mod dedup;
mod feeds;
mod hashtags;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod relevance;
mod summarize;
mod utils;

use api::{ChatCompletionClient, ChatCompletionConfig};
use cli::Cli;
use config::PipelineConfig;
use feeds::HttpFeedSource;
use outputs::json;
use pipeline::Pipeline;
use summarize::{BackendSummarizer, LocalSummarizer};
use utils::{ensure_writable_dir, output_parent};

/// Per-request bound on feed downloads.
const FEED_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "mr_news_digest starting up");

    let args = Cli::parse();
    debug!(output = %args.output.display(), config = ?args.config, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml_file(path)?,
        None => {
            info!("No config file given; using built-in configuration");
            PipelineConfig::default()
        }
    };
    if let Some(secs) = args.summary_timeout_secs {
        config.summary_timeout_secs = secs;
    }
    if let Some(n) = args.concurrency {
        config.summary_concurrency = n;
    }

    // Early check: fail before any network work if the output can't be written.
    let out_dir = output_parent(&args.output);
    if let Err(e) = ensure_writable_dir(&out_dir).await {
        error!(
            path = %out_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e.into());
    }

    let max_chars = config.summary_max_chars;
    let summary_timeout = Duration::from_secs(config.summary_timeout_secs);
    let pipeline = Pipeline::new(config)?;
    let source = HttpFeedSource::new(FEED_TIMEOUT)?;

    // ---- Run ----
    let doc = match args.backend_key() {
        Some(key) => {
            let client = ChatCompletionClient::new(ChatCompletionConfig {
                api_key: key.to_string(),
                api_base: args.api_base.clone(),
                model: args.model.clone(),
                request_timeout: summary_timeout,
            })?;
            info!(model = %args.model, api_base = %args.api_base, "Using backend summarizer");
            let summarizer = BackendSummarizer::new(client, summary_timeout, max_chars);
            pipeline.run(&source, &summarizer).await
        }
        None => {
            info!("No API key; using local summarizer");
            pipeline.run(&source, &LocalSummarizer::new(max_chars)).await
        }
    };

    // ---- Output ----
    if let Err(e) = json::write_document(&doc, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed to write JSON document");
        return Err(e.into());
    }
    info!(path = %args.output.display(), "Wrote digest");

    let elapsed = start_time.elapsed();
    info!(
        elapsed_secs = elapsed.as_secs(),
        elapsed_ms = elapsed.as_millis() as u64,
        "mr_news_digest completed"
    );

    Ok(())
}
