//! Topical relevance gate.
//!
//! Rules are applied in order and the first match decides:
//! 1. any negative (press-release boilerplate) term drops the item, whatever its source;
//! 2. a trusted host keeps it;
//! 3. otherwise it is kept only if a positive domain term appears.

use crate::config::RelevanceConfig;
use crate::models::Item;
use crate::normalize::hostname;

/// Why an item was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Vetoed,
    Trusted,
    OnTopic,
    OffTopic,
}

impl Verdict {
    pub fn keep(self) -> bool {
        matches!(self, Verdict::Trusted | Verdict::OnTopic)
    }
}

#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    negative: Vec<String>,
    trusted_hosts: Vec<String>,
    positive: Vec<String>,
}

impl RelevanceFilter {
    /// Build a filter from the configured vocabularies.
    ///
    /// Terms are lowercased and trusted hosts lose any `www.` prefix, matching
    /// how item text and hostnames are compared.
    pub fn new(config: &RelevanceConfig) -> Self {
        let lower = |v: &[String]| v.iter().map(|s| s.to_lowercase()).collect::<Vec<_>>();
        Self {
            negative: lower(&config.negative),
            trusted_hosts: config
                .trusted_hosts
                .iter()
                .map(|h| {
                    let h = h.to_lowercase();
                    h.strip_prefix("www.").map(str::to_string).unwrap_or(h)
                })
                .collect(),
            positive: lower(&config.positive),
        }
    }

    /// Decide whether `item` is on-topic.
    ///
    /// # Arguments
    ///
    /// * `item` - The item; its title and raw text are searched
    ///
    /// # Returns
    ///
    /// The [`Verdict`] of the first rule that applies.
    pub fn evaluate(&self, item: &Item) -> Verdict {
        let text = format!(
            "{} {}",
            item.title.to_lowercase(),
            item.raw_text.to_lowercase()
        );

        if self.negative.iter().any(|term| text.contains(term.as_str())) {
            return Verdict::Vetoed;
        }

        let trusted = hostname(&item.link)
            .map(|host| self.trusted_hosts.iter().any(|h| *h == host))
            .unwrap_or(false);
        if trusted {
            return Verdict::Trusted;
        }

        if self.positive.iter().any(|term| text.contains(term.as_str())) {
            Verdict::OnTopic
        } else {
            Verdict::OffTopic
        }
    }

    pub fn keep(&self, item: &Item) -> bool {
        self.evaluate(item).keep()
    }
}
