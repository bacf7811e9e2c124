//! Raw entry normalization.
//!
//! [`normalize_entry`] is total: every [`RawEntry`] maps to an [`Item`] using the
//! documented defaults. Entries without a link still produce an `Item` with an
//! empty link; the deduplicator drops those.

use crate::models::{Item, RawEntry};
use chrono::{DateTime, Utc};
use url::Url;

/// Title used when an entry has none.
pub const UNTITLED: &str = "Untitled";

/// Map a raw entry to a canonical item.
///
/// `captured_at` stands in for entries with no parseable publication date.
pub fn normalize_entry(entry: &RawEntry, captured_at: DateTime<Utc>) -> Item {
    let title = non_empty(entry.title.as_deref())
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| UNTITLED.to_string());
    let link = non_empty(entry.link.as_deref())
        .map(|l| l.trim().to_string())
        .unwrap_or_default();

    let iso_date = entry
        .iso_date
        .as_deref()
        .and_then(parse_rfc3339)
        .or_else(|| entry.pub_date.as_deref().and_then(parse_rfc2822))
        .unwrap_or(captured_at);

    let source = hostname(&link)
        .or_else(|| non_empty(entry.creator.as_deref()).map(str::to_string))
        .or_else(|| non_empty(entry.author.as_deref()).map(str::to_string))
        .unwrap_or_default();

    let raw_text = [&entry.content_snippet, &entry.summary, &entry.content]
        .into_iter()
        .find_map(|field| non_empty(field.as_deref()))
        .unwrap_or_default()
        .to_string();

    Item {
        title,
        link,
        iso_date,
        source,
        raw_text,
    }
}

/// Lowercased host of `link` with any `www.` prefix removed.
///
/// `None` for malformed URLs and URLs without a host.
pub fn hostname(link: &str) -> Option<String> {
    let parsed = Url::parse(link).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").map(str::to_string).unwrap_or(host);
    (!host.is_empty()).then_some(host)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn captured() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_entry_gets_defaults() {
        let item = normalize_entry(&RawEntry::default(), captured());
        assert_eq!(item.title, UNTITLED);
        assert_eq!(item.link, "");
        assert_eq!(item.iso_date, captured());
        assert_eq!(item.source, "");
        assert_eq!(item.raw_text, "");
    }

    #[test]
    fn test_source_from_hostname_strips_www() {
        let entry = RawEntry {
            link: Some("https://WWW.Quirks.com/articles/x".to_string()),
            creator: Some("Jane".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_entry(&entry, captured()).source, "quirks.com");
    }

    #[test]
    fn test_source_falls_back_to_creator_then_author() {
        let creator = RawEntry {
            link: Some("not a url".to_string()),
            creator: Some("Jane Doe".to_string()),
            author: Some("Someone Else".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_entry(&creator, captured()).source, "Jane Doe");

        let author = RawEntry {
            author: Some("Someone Else".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_entry(&author, captured()).source, "Someone Else");
    }

    #[test]
    fn test_date_prefers_iso_then_pub_date() {
        let entry = RawEntry {
            iso_date: Some("2025-05-06T10:00:00+02:00".to_string()),
            pub_date: Some("Tue, 01 Apr 2025 08:00:00 GMT".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize_entry(&entry, captured()).iso_date,
            Utc.with_ymd_and_hms(2025, 5, 6, 8, 0, 0).unwrap()
        );

        let entry = RawEntry {
            iso_date: Some("garbage".to_string()),
            pub_date: Some("Tue, 01 Apr 2025 08:00:00 GMT".to_string()),
            ..Default::default()
        };
        assert_eq!(
            normalize_entry(&entry, captured()).iso_date,
            Utc.with_ymd_and_hms(2025, 4, 1, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_raw_text_prefers_snippet_over_summary_and_content() {
        let entry = RawEntry {
            content_snippet: Some("  ".to_string()),
            summary: Some("Summary text".to_string()),
            content: Some("<p>Content</p>".to_string()),
            ..Default::default()
        };
        assert_eq!(normalize_entry(&entry, captured()).raw_text, "Summary text");
    }

    #[test]
    fn test_hostname_rejects_malformed() {
        assert_eq!(hostname("mailto:someone@example.com"), None);
        assert_eq!(hostname(""), None);
        assert_eq!(hostname("https://mrweb.com/drno"), Some("mrweb.com".to_string()));
    }
}
