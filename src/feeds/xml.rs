//! RSS and Atom documents mapped onto [`RawEntry`].

use quick_xml::Reader;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use serde::Deserialize;

use super::FeedError;
use crate::models::RawEntry;
use crate::summarize::text::clean_text;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

/// RSS 1.0 keeps items beside the channel rather than inside it.
#[derive(Debug, Deserialize)]
struct Rdf {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "dc:date", alias = "date")]
    dc_date: Option<String>,
    #[serde(rename = "dc:creator", alias = "creator")]
    creator: Option<String>,
    author: Option<String>,
    description: Option<String>,
    #[serde(rename = "content:encoded", alias = "encoded")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(rename = "link", default)]
    links: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<AtomPerson>,
    summary: Option<AtomText>,
    content: Option<AtomText>,
}

#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomPerson {
    name: Option<String>,
}

/// Feed dialect, decided by the document's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Rss,
    Rdf,
    Atom,
}

/// Parse a feed body, detecting the format from its root element.
///
/// # Arguments
///
/// * `body` - The full XML document as returned by the feed URL
///
/// # Returns
///
/// The feed's entries in document order, or [`FeedError::UnrecognizedFormat`]
/// when the root is not `rss`, `rdf:RDF` or `feed`.
pub fn parse_feed(body: &str) -> Result<Vec<RawEntry>, FeedError> {
    let parse_err = |e: quick_xml::DeError| FeedError::Parse(e.to_string());

    match root_dialect(body)? {
        Some(Dialect::Rss) => {
            let rss: Rss = from_str(body).map_err(parse_err)?;
            Ok(rss.channel.items.into_iter().map(rss_entry).collect())
        }
        Some(Dialect::Rdf) => {
            let rdf: Rdf = from_str(body).map_err(parse_err)?;
            Ok(rdf.items.into_iter().map(rss_entry).collect())
        }
        Some(Dialect::Atom) => {
            let atom: AtomFeed = from_str(body).map_err(parse_err)?;
            Ok(atom.entries.into_iter().map(atom_entry).collect())
        }
        None => Err(FeedError::UnrecognizedFormat),
    }
}

/// Read up to the first start tag and map its local name to a dialect.
fn root_dialect(body: &str) -> Result<Option<Dialect>, FeedError> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let dialect = match e.local_name().as_ref() {
                    b"rss" => Some(Dialect::Rss),
                    b"RDF" => Some(Dialect::Rdf),
                    b"feed" => Some(Dialect::Atom),
                    _ => None,
                };
                return Ok(dialect);
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => continue,
            Err(e) => return Err(FeedError::Parse(e.to_string())),
        }
    }
}

fn rss_entry(item: RssItem) -> RawEntry {
    RawEntry {
        title: item.title,
        link: item.link.map(|l| l.trim().to_string()),
        iso_date: item.dc_date,
        pub_date: item.pub_date,
        creator: item.creator,
        author: item.author,
        content_snippet: item.description.as_deref().map(clean_text),
        summary: item.description,
        content: item.content,
    }
}

fn atom_entry(entry: AtomEntry) -> RawEntry {
    let link = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .and_then(|l| l.href.clone());
    let summary = entry.summary.map(|t| t.value);
    let content = entry.content.map(|t| t.value);
    let snippet = summary.as_deref().or(content.as_deref()).map(clean_text);

    RawEntry {
        title: entry.title.map(|t| t.value),
        link,
        iso_date: entry.published.or(entry.updated),
        pub_date: None,
        creator: None,
        author: entry.authors.into_iter().find_map(|a| a.name),
        content_snippet: snippet,
        summary,
        content,
    }
}
