//! The enrichment pipeline.
//!
//! ```text
//! feeds ──fetch (sequential)──▶ normalize ──▶ dedup/sort ──▶ relevance
//!       ──▶ summarize + classify (concurrent, joined) ──▶ assemble
//! ```
//!
//! Feed and summarization failures degrade the document; nothing here aborts a run.

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{Instrument, info, info_span, instrument, warn};

use crate::assemble::assemble;
use crate::classify::{FundingClassifier, TopicClassifier};
use crate::config::PipelineConfig;
use crate::dedup::dedup_and_sort;
use crate::feeds::FeedSource;
use crate::hashtags::HashtagRanker;
use crate::models::{EnrichedItem, Item, OutputDocument};
use crate::normalize::normalize_entry;
use crate::relevance::RelevanceFilter;
use crate::summarize::{Summarize, SummaryOrigin};

/// Configured pipeline stages, built once per run.
#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    relevance: RelevanceFilter,
    topics: TopicClassifier,
    funding: FundingClassifier,
    hashtags: HashtagRanker,
}

impl Pipeline {
    /// Build every stage from `config`.
    ///
    /// # Arguments
    ///
    /// * `config` - Vocabularies, taxonomy, caps and concurrency for the run
    ///
    /// # Returns
    ///
    /// The pipeline, or the compile error if `funding_pattern` is not a valid regex.
    pub fn new(config: PipelineConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            relevance: RelevanceFilter::new(&config.relevance),
            topics: TopicClassifier::new(&config.taxonomy),
            funding: FundingClassifier::new(&config.funding_pattern)?,
            hashtags: HashtagRanker::new(&config.hashtags, config.hashtag_cap),
            config,
        })
    }

    /// Run every stage and return the finished document.
    ///
    /// # Arguments
    ///
    /// * `source` - Where feed entries come from
    /// * `summarizer` - The strategy picked for this run
    ///
    /// # Returns
    ///
    /// The assembled [`OutputDocument`]. Feed and summarization failures only
    /// shrink or degrade it; this never fails.
    #[instrument(level = "info", skip_all, fields(feeds = self.config.feeds.len(), strategy = summarizer.strategy_name()))]
    pub async fn run<S, Z>(&self, source: &S, summarizer: &Z) -> OutputDocument
    where
        S: FeedSource,
        Z: Summarize,
    {
        let items = self.collect(source, Utc::now()).await;
        let selected = self.select(items);
        let enriched = self.enrich(selected, summarizer).await;
        let doc = assemble(&self.config, &enriched, &self.funding, &self.hashtags, Utc::now());
        info!(
            top_news = doc.top_news.len(),
            funding_ma = doc.funding_ma.len(),
            hashtags = doc.hashtags.len(),
            ticker = doc.ticker.len(),
            "Assembled document"
        );
        doc
    }

    /// Fetch every feed in order and normalize its entries.
    ///
    /// Feeds are fetched one at a time, once each. A failing feed is logged
    /// and contributes nothing.
    ///
    /// # Arguments
    ///
    /// * `source` - The feed source to query for each configured URL
    /// * `captured_at` - Date given to entries with no parseable date
    ///
    /// # Returns
    ///
    /// All normalized items, in feed-list order then entry order.
    pub async fn collect<S: FeedSource>(&self, source: &S, captured_at: DateTime<Utc>) -> Vec<Item> {
        let mut items = Vec::new();
        let mut failed = 0usize;
        for url in &self.config.feeds {
            match source.fetch(url).await {
                Ok(entries) => {
                    info!(%url, count = entries.len(), "Feed retrieved");
                    items.extend(entries.iter().map(|e| normalize_entry(e, captured_at)));
                }
                Err(e) => {
                    failed += 1;
                    warn!(%url, error = %e, "Feed failed; skipping");
                }
            }
        }
        info!(items = items.len(), failed_feeds = failed, "Collected feed entries");
        items
    }

    /// Deduplicate, order by date and keep relevant items.
    ///
    /// # Arguments
    ///
    /// * `items` - Normalized items in collection order
    ///
    /// # Returns
    ///
    /// One item per link, newest first, that passed the relevance filter.
    pub fn select(&self, items: Vec<Item>) -> Vec<Item> {
        let total = items.len();
        let unique = dedup_and_sort(items);
        let unique_count = unique.len();
        let relevant: Vec<Item> = unique
            .into_iter()
            .filter(|item| self.relevance.keep(item))
            .collect();
        info!(
            total,
            unique = unique_count,
            relevant = relevant.len(),
            "Selected relevant items"
        );
        relevant
    }

    /// Summarize and label every item concurrently, preserving input order.
    ///
    /// At most `summary_concurrency` summaries are in flight. Returns only once
    /// all of them have finished.
    pub async fn enrich<Z: Summarize>(&self, items: Vec<Item>, summarizer: &Z) -> Vec<EnrichedItem> {
        let t0 = Instant::now();
        let total = items.len();
        let topics = &self.topics;

        let mut results: Vec<(usize, EnrichedItem, SummaryOrigin)> = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let span = info_span!("enrich_item", index, link = %item.link);
                async move {
                    let input = if item.raw_text.trim().is_empty() {
                        item.title.as_str()
                    } else {
                        item.raw_text.as_str()
                    };
                    let summary = summarizer.summarize(input).await;
                    let labels = topics.classify(&item.title, &item.raw_text);
                    let enriched = EnrichedItem {
                        item,
                        summary: summary.text,
                        topics: labels,
                    };
                    (index, enriched, summary.origin)
                }
                .instrument(span)
            })
            .buffer_unordered(self.config.summary_concurrency.max(1))
            .collect()
            .await;

        results.sort_by_key(|(index, _, _)| *index);

        let count = |wanted: SummaryOrigin| results.iter().filter(|(_, _, o)| *o == wanted).count();
        let backend = count(SummaryOrigin::Backend);
        let fallbacks = count(SummaryOrigin::Fallback);
        let elapsed = t0.elapsed();
        info!(
            total,
            backend,
            fallbacks,
            elapsed_ms = elapsed.as_millis() as u64,
            "Completed item enrichment"
        );

        results.into_iter().map(|(_, enriched, _)| enriched).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AskAsync, SummarizationError};
    use crate::config::{HashtagConfig, RelevanceConfig, TopicRule};
    use crate::feeds::FeedError;
    use crate::models::RawEntry;
    use crate::summarize::{BackendSummarizer, LocalSummarizer};
    use std::collections::HashMap;
    use std::time::Duration;

    /// In-memory feeds keyed by URL; unknown URLs fail.
    struct FixtureSource(HashMap<String, Vec<RawEntry>>);

    impl FeedSource for FixtureSource {
        async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| FeedError::Parse(format!("no fixture for {url}")))
        }
    }

    struct RefusesFailMarker;

    impl AskAsync for RefusesFailMarker {
        async fn ask(&self, prompt: &str) -> Result<String, SummarizationError> {
            if prompt.contains("FAIL") {
                return Err(SummarizationError::Malformed("refused".to_string()));
            }
            Ok("Backend synopsis.".to_string())
        }
    }

    fn entry(title: &str, link: &str, date: &str, body: &str) -> RawEntry {
        RawEntry {
            title: Some(title.to_string()),
            link: Some(link.to_string()),
            iso_date: Some(date.to_string()),
            content_snippet: Some(body.to_string()),
            ..Default::default()
        }
    }

    fn config(feeds: &[&str]) -> PipelineConfig {
        PipelineConfig {
            feeds: feeds.iter().map(|s| s.to_string()).collect(),
            taxonomy: vec![
                TopicRule::new("CX", &["customer experience"]),
                TopicRule::new("Quant", &["survey"]),
            ],
            relevance: RelevanceConfig {
                negative: vec!["cagr".to_string()],
                trusted_hosts: vec!["trusted.org".to_string()],
                positive: vec!["survey".to_string(), "customer experience".to_string()],
            },
            hashtags: HashtagConfig {
                stop_words: vec!["the".to_string()],
                short_acronyms: vec!["cx".to_string()],
            },
            summary_concurrency: 3,
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_end_to_end_dedup_with_failing_feed() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "https://feeds.one/rss".to_string(),
            vec![
                entry("Survey A", "https://news.example.com/a", "2025-05-06T12:00:00Z", "Survey of buyers."),
                entry("Survey B", "https://news.example.com/a", "2025-05-05T12:00:00Z", "Older survey copy."),
            ],
        );
        let source = FixtureSource(feeds);
        let pipeline = Pipeline::new(config(&["https://feeds.one/rss", "https://feeds.broken/rss"])).unwrap();

        let before = Utc::now();
        let doc = pipeline.run(&source, &LocalSummarizer::new(240)).await;
        let after = Utc::now();

        assert_eq!(doc.top_news.len(), 1);
        assert_eq!(doc.top_news[0].item.title, "Survey A");
        assert_eq!(doc.top_news[0].summary, "Survey of buyers.");
        assert_eq!(doc.top_news[0].topics, vec!["Quant".to_string()]);
        assert!(doc.ticker.len() <= 30);
        assert_eq!(doc.ticker.len(), 1);
        assert!(doc.generated_at >= before && doc.generated_at <= after);
        assert_eq!(doc.topics_available, vec!["CX".to_string(), "Quant".to_string()]);
    }

    #[tokio::test]
    async fn test_dedup_spans_feeds_in_feed_order() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "https://first".to_string(),
            vec![entry("From first", "https://x.com/1", "2025-05-01T00:00:00Z", "survey")],
        );
        feeds.insert(
            "https://second".to_string(),
            vec![entry("From second", "https://x.com/1", "2025-05-09T00:00:00Z", "survey")],
        );
        let pipeline = Pipeline::new(config(&["https://first", "https://second"])).unwrap();
        let items = pipeline.collect(&FixtureSource(feeds), Utc::now()).await;
        let selected = pipeline.select(items);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].title, "From first");
    }

    #[tokio::test]
    async fn test_select_applies_relevance_after_sorting() {
        let mut feeds = HashMap::new();
        feeds.insert(
            "https://f".to_string(),
            vec![
                entry("Old survey", "https://x.com/1", "2025-05-01T00:00:00Z", ""),
                entry("Survey market CAGR", "https://x.com/2", "2025-05-03T00:00:00Z", ""),
                entry("Meetup notes", "https://trusted.org/3", "2025-05-02T00:00:00Z", ""),
                entry("Football", "https://x.com/4", "2025-05-04T00:00:00Z", ""),
            ],
        );
        let pipeline = Pipeline::new(config(&["https://f"])).unwrap();
        let items = pipeline.collect(&FixtureSource(feeds), Utc::now()).await;
        let titles: Vec<String> = pipeline.select(items).into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["Meetup notes".to_string(), "Old survey".to_string()]);
    }

    #[tokio::test]
    async fn test_enrich_preserves_order_and_falls_back_per_item() {
        let now = Utc::now();
        let items: Vec<Item> = ["survey one", "survey FAIL two", "", "survey four"]
            .iter()
            .enumerate()
            .map(|(n, body)| Item {
                title: format!("Title {n}"),
                link: format!("https://x.com/{n}"),
                iso_date: now,
                source: "x.com".to_string(),
                raw_text: body.to_string(),
            })
            .collect();
        let pipeline = Pipeline::new(config(&[])).unwrap();
        let summarizer = BackendSummarizer::new(RefusesFailMarker, Duration::from_secs(5), 240);
        let enriched = pipeline.enrich(items, &summarizer).await;

        let titles: Vec<&str> = enriched.iter().map(|e| e.item.title.as_str()).collect();
        assert_eq!(titles, vec!["Title 0", "Title 1", "Title 2", "Title 3"]);
        assert_eq!(enriched[0].summary, "Backend synopsis.");
        assert_eq!(enriched[1].summary, "survey FAIL two");
        assert_eq!(enriched[2].topics, vec!["(Other)".to_string()]);
        assert_eq!(enriched[3].topics, vec!["Quant".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_title_body_summarizes_title() {
        let item = Item {
            title: "Headline only".to_string(),
            link: "https://x.com/1".to_string(),
            iso_date: Utc::now(),
            source: String::new(),
            raw_text: "   ".to_string(),
        };
        let pipeline = Pipeline::new(config(&[])).unwrap();
        let enriched = pipeline.enrich(vec![item], &LocalSummarizer::new(240)).await;
        assert_eq!(enriched[0].summary, "Headline only");
    }

    #[tokio::test]
    async fn test_all_feeds_failing_yields_empty_document() {
        let pipeline = Pipeline::new(config(&["https://a", "https://b"])).unwrap();
        let doc = pipeline
            .run(&FixtureSource(HashMap::new()), &LocalSummarizer::new(240))
            .await;
        assert!(doc.top_news.is_empty());
        assert!(doc.funding_ma.is_empty());
        assert!(doc.hashtags.is_empty());
        assert!(doc.ticker.is_empty());
    }

    #[test]
    fn test_invalid_funding_pattern_rejected() {
        let config = PipelineConfig {
            funding_pattern: "(".to_string(),
            ..PipelineConfig::default()
        };
        assert!(Pipeline::new(config).is_err());
    }
}
