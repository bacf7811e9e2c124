//! HTTP feed retrieval.

use std::time::{Duration, Instant};
use tracing::{info, instrument};

use super::xml::parse_feed;
use super::{FeedError, FeedSource};
use crate::models::RawEntry;

/// Fetches feeds over HTTP and parses them as RSS or Atom.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("mr_news_digest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FeedSource for HttpFeedSource {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError> {
        let t0 = Instant::now();
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let entries = parse_feed(&body)?;
        info!(
            count = entries.len(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched feed"
        );
        Ok(entries)
    }
}
