//! Text-generation backend used for AI summaries.
//!
//! - [`AskAsync`]: core trait for "send a prompt, get text back"
//! - [`ChatCompletionClient`]: OpenAI-compatible `/chat/completions` implementation
//!
//! Calls are made once. There is no retry layer: a failed call is reported to
//! the caller, which falls back to the local summarizer for that item.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::utils::truncate_for_log;

/// Failures of the summarization backend. All of them are recoverable per item.
#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend response was malformed: {0}")]
    Malformed(String),
    #[error("backend returned an empty completion")]
    Empty,
    #[error("backend call timed out after {after:?}")]
    Timeout { after: Duration },
}

/// Trait for async text generation.
///
/// Implementors take a complete prompt and return the generated text.
pub trait AskAsync {
    async fn ask(&self, prompt: &str) -> Result<String, SummarizationError>;
}

/// Connection settings for [`ChatCompletionClient`].
#[derive(Debug, Clone)]
pub struct ChatCompletionConfig {
    pub api_key: String,
    /// Base URL up to and including the version segment, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub model: String,
    /// Transport-level timeout. The summarizer applies its own per-call bound on top.
    pub request_timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You write short, neutral news synopses for a market research dashboard. Output plain text only.";

/// OpenAI-compatible chat completion client.
pub struct ChatCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for ChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

impl ChatCompletionClient {
    pub fn new(config: ChatCompletionConfig) -> Result<Self, SummarizationError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mr_news_digest/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: chat_endpoint(&config.api_base),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

impl AskAsync for ChatCompletionClient {
    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, SummarizationError> {
        let t0 = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.2,
            max_tokens: 160,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = dt.as_millis() as u64,
                "Backend returned non-success status"
            );
            return Err(SummarizationError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&body, 300),
            });
        }

        let text = parse_completion(&body)?;
        debug!(elapsed_ms = dt.as_millis() as u64, chars = text.len(), "Backend call succeeded");
        Ok(text)
    }
}

/// Resolve the chat completions URL from a base URL.
pub fn chat_endpoint(api_base: &str) -> String {
    let base = api_base.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

/// Extract the first choice's content from a chat completion body.
pub fn parse_completion(body: &str) -> Result<String, SummarizationError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        SummarizationError::Malformed(format!("{e}; body: {}", truncate_for_log(body, 200)))
    })?;
    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| SummarizationError::Malformed("no choices in response".to_string()))?;
    if content.trim().is_empty() {
        return Err(SummarizationError::Empty);
    }
    Ok(content)
}
