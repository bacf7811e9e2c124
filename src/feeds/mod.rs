//! Feed sources.
//!
//! A [`FeedSource`] turns a feed URL into a list of [`RawEntry`] records or a
//! [`FeedError`]. The pipeline calls it once per configured URL, in order, and
//! treats a failure as an empty contribution from that feed.
//!
//! | Implementation | Module | Notes |
//! |----------------|--------|-------|
//! | [`HttpFeedSource`] | [`http`] | `reqwest` fetch, RSS 2.0 / RSS 1.0 / Atom via [`xml`] |

pub mod http;
pub mod xml;

use thiserror::Error;

use crate::models::RawEntry;

pub use http::HttpFeedSource;

/// Retrieval or parse failure for a single feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed could not be parsed: {0}")]
    Parse(String),
    #[error("document is neither RSS nor Atom")]
    UnrecognizedFormat,
}

/// Something that can produce raw entries for a feed URL.
pub trait FeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>, FeedError>;
}
