//! Item summarization strategies.
//!
//! The strategy is picked once per run by the caller:
//! - [`LocalSummarizer`]: tag-stripping plus sentence truncation, always available
//! - [`BackendSummarizer`]: asks a text-generation backend, falling back to the
//!   local strategy for any item whose call fails or times out
//!
//! Both guarantee output of at most `max_chars` characters.

pub mod text;

use std::time::Duration;
use tracing::{instrument, warn};

use crate::api::{AskAsync, SummarizationError};
use text::{clean_text, fallback_summary, tidy_backend_output};

/// Where a synopsis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOrigin {
    Local,
    Backend,
    /// The backend failed and the local strategy was used instead.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub text: String,
    pub origin: SummaryOrigin,
}

/// A summarization strategy.
pub trait Summarize {
    fn strategy_name(&self) -> &'static str;

    /// Produce a synopsis of `text`. Never fails.
    async fn summarize(&self, text: &str) -> Summary;
}

/// Local, dependency-free summarizer.
#[derive(Debug, Clone)]
pub struct LocalSummarizer {
    max_chars: usize,
}

impl LocalSummarizer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Summarize for LocalSummarizer {
    fn strategy_name(&self) -> &'static str {
        "local"
    }

    async fn summarize(&self, text: &str) -> Summary {
        Summary {
            text: fallback_summary(text, self.max_chars),
            origin: SummaryOrigin::Local,
        }
    }
}

/// Backend-driven summarizer with per-call timeout and local fallback.
#[derive(Debug)]
pub struct BackendSummarizer<C> {
    client: C,
    timeout: Duration,
    max_chars: usize,
}

impl<C: AskAsync> BackendSummarizer<C> {
    pub fn new(client: C, timeout: Duration, max_chars: usize) -> Self {
        Self {
            client,
            timeout,
            max_chars,
        }
    }

    async fn ask_bounded(&self, prompt: &str) -> Result<String, SummarizationError> {
        match tokio::time::timeout(self.timeout, self.client.ask(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(SummarizationError::Timeout {
                after: self.timeout,
            }),
        }
    }
}

impl<C: AskAsync> Summarize for BackendSummarizer<C> {
    fn strategy_name(&self) -> &'static str {
        "backend"
    }

    #[instrument(level = "debug", skip_all)]
    async fn summarize(&self, text: &str) -> Summary {
        let prompt = build_prompt(text, self.max_chars);
        let outcome = self
            .ask_bounded(&prompt)
            .await
            .map(|reply| tidy_backend_output(&reply, self.max_chars))
            .and_then(|tidy| {
                if tidy.is_empty() {
                    Err(SummarizationError::Empty)
                } else {
                    Ok(tidy)
                }
            });

        match outcome {
            Ok(text) => Summary {
                text,
                origin: SummaryOrigin::Backend,
            },
            Err(e) => {
                warn!(error = %e, "Summarization backend failed; using local summary");
                Summary {
                    text: fallback_summary(text, self.max_chars),
                    origin: SummaryOrigin::Fallback,
                }
            }
        }
    }
}

/// Instruction sent to the backend for one item.
pub fn build_prompt(text: &str, max_chars: usize) -> String {
    format!(
        "Summarize the following news item in at most {max_chars} characters, as no more than 2 short lines. \
         Do not add facts that are not in the text.\n\n{}",
        clean_text(text)
    )
}
