//! Pipeline configuration.
//!
//! Every vocabulary, list and cap the pipeline uses lives in [`PipelineConfig`].
//! [`PipelineConfig::default`] carries the production values; tests build small
//! fixture configs instead. An optional YAML file can override any subset of
//! keys (absent keys keep their defaults).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

/// Label assigned when no taxonomy topic matches.
pub const OTHER_TOPIC: &str = "(Other)";

/// Errors raised while loading a configuration override file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One taxonomy entry: a topic name and the lowercase substrings that select it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TopicRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl TopicRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: strings(keywords),
        }
    }
}

/// Which text the funding/M&A classifier looks at besides the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingBasis {
    /// The final synopsis (the historical behavior).
    #[default]
    Summary,
    /// The raw entry text, before summarization.
    RawText,
}

/// Vocabularies for the relevance filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Press-release boilerplate. Any hit is a hard veto.
    pub negative: Vec<String>,
    /// Hosts exempt from the positive-vocabulary requirement.
    pub trusted_hosts: Vec<String>,
    /// Domain terms; at least one must appear for untrusted sources.
    pub positive: Vec<String>,
}

/// Vocabularies for the hashtag ranker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HashtagConfig {
    pub stop_words: Vec<String>,
    /// Short tokens kept despite their length and rendered uppercase.
    pub short_acronyms: Vec<String>,
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Feed URLs, fetched in this order.
    pub feeds: Vec<String>,
    /// Ordered topic taxonomy.
    pub taxonomy: Vec<TopicRule>,
    /// Case-insensitive regex for funding/M&A detection.
    pub funding_pattern: String,
    pub funding_basis: FundingBasis,
    pub relevance: RelevanceConfig,
    pub hashtags: HashtagConfig,
    pub summary_max_chars: usize,
    /// Maximum summarization calls in flight.
    pub summary_concurrency: usize,
    /// Per-call bound on the summarization backend.
    pub summary_timeout_secs: u64,
    pub top_news_cap: usize,
    pub funding_cap: usize,
    pub ticker_cap: usize,
    pub hashtag_cap: usize,
}

impl PipelineConfig {
    /// Load defaults overridden by a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config = Self::from_yaml_str(&text).map_err(|source| ConfigError::Yaml {
            path: display,
            source,
        })?;
        info!(
            feeds = config.feeds.len(),
            topics = config.taxonomy.len(),
            "Loaded pipeline configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Taxonomy keys in declaration order.
    pub fn topic_names(&self) -> Vec<String> {
        self.taxonomy.iter().map(|t| t.name.clone()).collect()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            taxonomy: default_taxonomy(),
            funding_pattern: DEFAULT_FUNDING_PATTERN.to_string(),
            funding_basis: FundingBasis::default(),
            relevance: RelevanceConfig::default(),
            hashtags: HashtagConfig::default(),
            summary_max_chars: 240,
            summary_concurrency: 12,
            summary_timeout_secs: 20,
            top_news_cap: 50,
            funding_cap: 50,
            ticker_cap: 30,
            hashtag_cap: 20,
        }
    }
}

const DEFAULT_FUNDING_PATTERN: &str = r"(?i)\b(?:funding|raised|raises|seed|series [a-e]|acquires?|acquired|acquisition|merger|m&a|buyout|invest(?:s|ed|ing|ment|ments|or|ors)?|venture|vc)\b";

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_feeds() -> Vec<String> {
    strings(&[
        "https://www.research-live.com/rss",
        "https://www.greenbook.org/rss/all",
        "https://www.quirks.com/rss/articles",
        "https://mrweb.com/drno/rss.xml",
        "https://www.insightsassociation.org/rss.xml",
        "https://news.google.com/rss/search?q=%22market+research%22&hl=en-US&gl=US&ceid=US:en",
        "https://news.google.com/rss/search?q=%22customer+experience%22+survey&hl=en-US&gl=US&ceid=US:en",
        "https://news.google.com/rss/search?q=%22consumer+insights%22&hl=en-US&gl=US&ceid=US:en",
    ])
}

fn default_taxonomy() -> Vec<TopicRule> {
    vec![
        TopicRule::new(
            "CX",
            &[
                "customer experience",
                " cx ",
                "net promoter",
                "nps",
                "csat",
                "voice of the customer",
                "customer satisfaction",
            ],
        ),
        TopicRule::new(
            "Qualitative",
            &[
                "qualitative",
                "focus group",
                "ethnograph",
                "in-depth interview",
                "diary study",
                "online community",
            ],
        ),
        TopicRule::new(
            "Quantitative",
            &[
                "quantitative",
                "survey",
                "questionnaire",
                "conjoint",
                "maxdiff",
                "segmentation",
                "panel",
                "sample",
            ],
        ),
        TopicRule::new(
            "AI & Automation",
            &[
                "artificial intelligence",
                " ai ",
                "ai-",
                "generative",
                "machine learning",
                "llm",
                "synthetic data",
                "synthetic respondent",
                "automation",
            ],
        ),
        TopicRule::new(
            "UX Research",
            &["user research", "usability", "user experience", " ux "],
        ),
        TopicRule::new(
            "Methodology",
            &[
                "methodology",
                "sampling",
                "weighting",
                "data quality",
                "fraud",
                "validity",
            ],
        ),
        TopicRule::new(
            "Industry",
            &[
                "acquisition",
                "acquires",
                "merger",
                "funding",
                "revenue",
                "appoints",
                "hires",
                "partnership",
                "esomar",
                "insights association",
            ],
        ),
    ]
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            negative: strings(&[
                "forecast",
                "cagr",
                "market size",
                "market share analysis",
                "market to reach",
                "market is expected",
                "usd ",
                "us$",
                "billion by 20",
                "million by 20",
                "2030",
                "2031",
                "2032",
                "2033",
                "2034",
                "openpr",
                "einpresswire",
                "globenewswire",
                "prnewswire",
                "market research future",
                "marketsandmarkets",
                "grand view research",
                "allied market research",
                "precedence research",
            ]),
            trusted_hosts: strings(&[
                "research-live.com",
                "greenbook.org",
                "quirks.com",
                "mrweb.com",
                "insightsassociation.org",
                "esomar.org",
                "mrs.org.uk",
                "researchworld.com",
            ]),
            positive: strings(&[
                "market research",
                "consumer research",
                "consumer insight",
                "insights",
                "survey",
                "questionnaire",
                "respondent",
                "panel",
                "qualitative",
                "quantitative",
                "focus group",
                "ethnograph",
                "customer experience",
                "voice of the customer",
                "net promoter",
                "csat",
                "methodology",
                "sampling",
                "segmentation",
                "conjoint",
                "polling",
                "user research",
            ]),
        }
    }
}

impl Default for HashtagConfig {
    fn default() -> Self {
        Self {
            stop_words: strings(&[
                "the", "and", "for", "with", "from", "that", "this", "into", "your", "you",
                "are", "was", "were", "will", "have", "has", "had", "new", "how", "why", "what",
                "when", "who", "its", "our", "their", "about", "after", "over", "more", "than",
                "just", "can", "not", "but", "all", "out", "now", "news", "report", "reports",
                "says", "said", "market", "markets", "growth", "study", "data", "top", "best",
                "via", "amid", "year", "years", "inc", "ltd", "llc", "company", "companies",
                "com", "www", "http", "https", "html", "here", "they", "them", "most", "among",
                "could", "would", "should", "latest", "week", "today",
            ]),
            short_acronyms: strings(&[
                "ai", "cx", "ux", "ex", "mr", "nps", "voc", "b2b", "b2c", "dei", "ml", "llm",
                "csat",
            ]),
        }
    }
}
