//! Data models flowing through the enrichment pipeline.
//!
//! - [`RawEntry`]: an entry as handed over by a feed source, every field optional
//! - [`Item`]: the canonical record after normalization
//! - [`EnrichedItem`]: an [`Item`] with its summary and topic labels
//! - [`Hashtag`], [`TickerEntry`]: derived, display-only records
//! - [`OutputDocument`]: the JSON document consumed by the dashboard
//!
//! Serialized field names follow the dashboard's camelCase convention for items
//! and snake_case for the top-level document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A feed entry before normalization.
///
/// Mirrors what RSS/Atom parsers usually expose. Nothing is guaranteed to be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    /// RFC 3339 timestamp, when the source provides one.
    pub iso_date: Option<String>,
    /// RFC 2822 timestamp (RSS `pubDate`).
    pub pub_date: Option<String>,
    pub creator: Option<String>,
    pub author: Option<String>,
    /// Plain-text rendition of the entry body.
    pub content_snippet: Option<String>,
    pub summary: Option<String>,
    /// Full body, possibly HTML.
    pub content: Option<String>,
}

/// A normalized feed entry. `link` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub title: String,
    pub link: String,
    pub iso_date: DateTime<Utc>,
    pub source: String,
    #[serde(skip)]
    pub raw_text: String,
}

/// An [`Item`] with its synopsis and topic labels attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: Item,
    pub summary: String,
    /// Taxonomy labels in declaration order; never empty.
    pub topics: Vec<String>,
}

/// A trending topic rendered for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Hashtag {
    /// `#word` or `#ACRONYM`.
    pub label: String,
    /// Search-engine query for the label.
    pub url: String,
}

/// Headline and link for the scrolling ticker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TickerEntry {
    pub text: String,
    pub link: String,
}

/// The complete output of one run. Rebuilt from scratch every time.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    pub generated_at: DateTime<Utc>,
    pub topics_available: Vec<String>,
    pub top_news: Vec<EnrichedItem>,
    pub funding_ma: Vec<EnrichedItem>,
    pub hashtags: Vec<Hashtag>,
    pub ticker: Vec<TickerEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> Item {
        Item {
            title: "Panel quality under scrutiny".to_string(),
            link: "https://example.com/a".to_string(),
            iso_date: Utc.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap(),
            source: "example.com".to_string(),
            raw_text: "Body text".to_string(),
        }
    }

    #[test]
    fn test_raw_entry_deserializes_camel_case() {
        let json = r#"{
            "title": "Hello",
            "link": "https://example.com/x",
            "isoDate": "2025-05-06T10:00:00Z",
            "contentSnippet": "Snippet"
        }"#;
        let entry: RawEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.title.as_deref(), Some("Hello"));
        assert_eq!(entry.iso_date.as_deref(), Some("2025-05-06T10:00:00Z"));
        assert_eq!(entry.content_snippet.as_deref(), Some("Snippet"));
        assert!(entry.pub_date.is_none());
    }

    #[test]
    fn test_enriched_item_serializes_flat_without_raw_text() {
        let enriched = EnrichedItem {
            item: sample_item(),
            summary: "Short".to_string(),
            topics: vec!["Quantitative".to_string()],
        };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["title"], "Panel quality under scrutiny");
        assert_eq!(value["isoDate"], "2025-05-06T14:30:00Z");
        assert_eq!(value["source"], "example.com");
        assert_eq!(value["topics"][0], "Quantitative");
        assert!(value.get("rawText").is_none());
        assert!(value.get("item").is_none());
    }

    #[test]
    fn test_output_document_key_order() {
        let doc = OutputDocument {
            generated_at: Utc.with_ymd_and_hms(2025, 5, 6, 0, 0, 0).unwrap(),
            topics_available: vec!["CX".to_string()],
            top_news: vec![],
            funding_ma: vec![],
            hashtags: vec![],
            ticker: vec![TickerEntry {
                text: "Headline".to_string(),
                link: "https://example.com".to_string(),
            }],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let order = [
            "generated_at",
            "topics_available",
            "top_news",
            "funding_ma",
            "hashtags",
            "ticker",
        ];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
