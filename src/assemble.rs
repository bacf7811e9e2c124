//! Final document composition.

use chrono::{DateTime, Utc};

use crate::classify::FundingClassifier;
use crate::config::{FundingBasis, PipelineConfig};
use crate::hashtags::HashtagRanker;
use crate::models::{EnrichedItem, OutputDocument, TickerEntry};

/// Compose the output document from date-ordered, filtered, enriched items.
pub fn assemble(
    config: &PipelineConfig,
    items: &[EnrichedItem],
    funding: &FundingClassifier,
    ranker: &HashtagRanker,
    generated_at: DateTime<Utc>,
) -> OutputDocument {
    let top_news: Vec<EnrichedItem> = items.iter().take(config.top_news_cap).cloned().collect();

    let funding_ma = items
        .iter()
        .filter(|e| {
            let text = match config.funding_basis {
                FundingBasis::Summary => &e.summary,
                FundingBasis::RawText => &e.item.raw_text,
            };
            funding.is_funding(&e.item.title, text)
        })
        .take(config.funding_cap)
        .cloned()
        .collect();

    let ticker = items
        .iter()
        .take(config.ticker_cap)
        .map(|e| TickerEntry {
            text: e.item.title.clone(),
            link: e.item.link.clone(),
        })
        .collect();

    let hashtags = ranker.rank(&top_news);

    OutputDocument {
        generated_at,
        topics_available: config.topic_names(),
        top_news,
        funding_ma,
        hashtags,
        ticker,
    }
}
