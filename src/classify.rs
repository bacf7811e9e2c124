//! Keyword classifiers: topic labels and funding/M&A detection.

use crate::config::{OTHER_TOPIC, TopicRule};
use regex::Regex;

/// Assigns taxonomy labels by substring match over title and raw text.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    rules: Vec<TopicRule>,
}

impl TopicClassifier {
    /// Build a classifier over `taxonomy`, keeping its order. Keywords are lowercased.
    pub fn new(taxonomy: &[TopicRule]) -> Self {
        let rules = taxonomy
            .iter()
            .map(|rule| TopicRule {
                name: rule.name.clone(),
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Matching topics in taxonomy order, or `["(Other)"]` when none match.
    pub fn classify(&self, title: &str, raw_text: &str) -> Vec<String> {
        // Padded so keywords like " ai " can match at either end.
        let text = format!(" {} {} ", title, raw_text).to_lowercase();
        let topics: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|rule| rule.name.clone())
            .collect();

        if topics.is_empty() {
            vec![OTHER_TOPIC.to_string()]
        } else {
            topics
        }
    }
}

/// Flags funding, investment and M&A stories.
#[derive(Debug, Clone)]
pub struct FundingClassifier {
    pattern: Regex,
}

impl FundingClassifier {
    /// Compile `pattern` case-insensitively.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self { pattern })
    }

    pub fn is_funding(&self, title: &str, text: &str) -> bool {
        self.pattern.is_match(title) || self.pattern.is_match(text)
    }
}
