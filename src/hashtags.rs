//! Trending hashtags from headline word frequencies.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::config::HashtagConfig;
use crate::models::{EnrichedItem, Hashtag};

static RE_PUBLISHER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+-\s+[^-]*$").expect("publisher suffix regex"));
static RE_NON_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9#]+").expect("non-token regex"));
static RE_BARE_DOMAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+\.com$").expect("bare domain regex"));
static RE_SUFFIX_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:co|uk|in|us|eu|de|fr|it)$").expect("suffix fragment regex"));

const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Ranks headline words into hashtags.
#[derive(Debug, Clone)]
pub struct HashtagRanker {
    stop_words: HashSet<String>,
    short_acronyms: HashSet<String>,
    cap: usize,
}

impl HashtagRanker {
    /// Build a ranker.
    ///
    /// # Arguments
    ///
    /// * `config` - Stop words and the short-acronym allow-list
    /// * `cap` - Maximum number of hashtags returned by [`rank`](Self::rank)
    pub fn new(config: &HashtagConfig, cap: usize) -> Self {
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<HashSet<_>>();
        Self {
            stop_words: lower(&config.stop_words),
            short_acronyms: lower(&config.short_acronyms),
            cap,
        }
    }

    /// Rank hashtags from the titles of `items`.
    ///
    /// # Returns
    ///
    /// At most `cap` hashtags, most frequent first, ties in alphabetical order.
    /// Empty input gives an empty list.
    pub fn rank(&self, items: &[EnrichedItem]) -> Vec<Hashtag> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for item in items {
            for token in tokenize(&item.item.title) {
                if self.is_candidate(&token) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|(a, ca), (b, cb)| cb.cmp(ca).then_with(|| a.cmp(b)));

        ranked
            .into_iter()
            .filter(|(token, _)| token.chars().count() >= 4 || self.short_acronyms.contains(token))
            .take(self.cap)
            .map(|(token, _)| self.render(&token))
            .collect()
    }

    fn is_candidate(&self, token: &str) -> bool {
        let long_enough = token.chars().count() >= 3 || self.short_acronyms.contains(token);
        long_enough
            && !self.stop_words.contains(token)
            && !RE_BARE_DOMAIN.is_match(token)
            && !RE_SUFFIX_FRAGMENT.is_match(token)
            && !token.chars().all(|c| c.is_ascii_digit())
    }

    fn render(&self, token: &str) -> Hashtag {
        let label = if self.short_acronyms.contains(token) {
            format!("#{}", token.to_uppercase())
        } else {
            format!("#{token}")
        };
        let url = format!("{SEARCH_URL}{}", urlencoding::encode(&label));
        Hashtag { label, url }
    }
}

/// Lowercased title words, publisher suffix removed.
fn tokenize(title: &str) -> Vec<String> {
    let without_suffix = RE_PUBLISHER_SUFFIX.replace(title, "");
    let lowered = without_suffix.to_lowercase();
    RE_NON_TOKEN
        .replace_all(&lowered, " ")
        .split_whitespace()
        .map(|t| t.trim_matches('#'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
