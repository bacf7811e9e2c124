//! Command-line interface definitions for the digest builder.
//!
//! Backend credentials can also be supplied through environment variables.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for one digest run.
///
/// # Examples
///
/// ```sh
/// # Local summaries, default output path
/// mr_news_digest
///
/// # Backend summaries with a custom config
/// OPENAI_API_KEY=sk-... mr_news_digest -c config.yaml -o public/data/news.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Where to write the JSON document
    #[arg(short, long, default_value = "data/news.json")]
    pub output: PathBuf,

    /// Optional path to a YAML file overriding the built-in configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// API key for the summarization backend; without it summaries are built locally
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible backend
    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    /// Model requested from the backend
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Per-item summarization timeout in seconds (overrides the config file)
    #[arg(long)]
    pub summary_timeout_secs: Option<u64>,

    /// Maximum concurrent summarization calls (overrides the config file)
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl Cli {
    /// The API key, if one was given and is not blank.
    pub fn backend_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mr_news_digest"]);
        assert_eq!(cli.output, PathBuf::from("data/news.json"));
        assert!(cli.config.is_none());
        assert!(cli.summary_timeout_secs.is_none());
        assert!(cli.concurrency.is_none());
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["mr_news_digest", "-o", "/tmp/out.json", "-c", "/tmp/config.yaml"]);
        assert_eq!(cli.output, PathBuf::from("/tmp/out.json"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.yaml")));
    }

    #[test]
    fn test_cli_backend_flags() {
        let cli = Cli::parse_from([
            "mr_news_digest",
            "--api-key",
            "secret",
            "--api-base",
            "http://localhost:8080/v1",
            "--model",
            "local-model",
            "--summary-timeout-secs",
            "5",
            "--concurrency",
            "4",
        ]);
        assert_eq!(cli.backend_key(), Some("secret"));
        assert_eq!(cli.api_base, "http://localhost:8080/v1");
        assert_eq!(cli.model, "local-model");
        assert_eq!(cli.summary_timeout_secs, Some(5));
        assert_eq!(cli.concurrency, Some(4));
    }

    #[test]
    fn test_blank_api_key_means_no_backend() {
        let cli = Cli::parse_from(["mr_news_digest", "--api-key", "  "]);
        assert_eq!(cli.backend_key(), None);
    }
}
