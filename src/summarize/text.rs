//! Plain-text cleanup used by every summarization strategy.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Marker appended to hard-truncated text.
pub const ELLIPSIS: char = '…';

/// Elements that break the text flow. Inline tags (`b`, `a`, `span`, ...) do not.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "hr", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td",
    "th", "table", "blockquote", "pre", "section", "article", "header", "footer", "figure",
    "figcaption",
];

/// Strip HTML tags and collapse whitespace.
///
/// Text inside inline tags is joined to its neighbours unchanged; block-level
/// boundaries become a single space.
pub fn clean_text(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut text = String::with_capacity(input.len());
    push_text(fragment.root_element(), &mut text);
    RE_WS.replace_all(&text, " ").trim().to_string()
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                let block = BLOCK_ELEMENTS.contains(&e.name());
                if block {
                    out.push(' ');
                }
                if let Some(inner) = ElementRef::wrap(child) {
                    push_text(inner, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// The first `count` sentences of `text`.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace. Text with fewer
/// sentence breaks is returned whole.
pub fn leading_sentences(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        if chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            seen += 1;
            if seen == count {
                return text[..i + c.len_utf8()].trim_end();
            }
        }
    }
    text.trim_end()
}

/// Limit `text` to `max_chars` characters, ending with [`ELLIPSIS`] when cut.
pub fn cap_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.truncate(out.trim_end().len());
    out.push(ELLIPSIS);
    out
}

/// Local synopsis: clean, keep two sentences, cap.
pub fn fallback_summary(text: &str, max_chars: usize) -> String {
    let cleaned = clean_text(text);
    cap_chars(leading_sentences(&cleaned, 2), max_chars)
}

/// Cleanup and cap applied to backend output.
pub fn tidy_backend_output(text: &str, max_chars: usize) -> String {
    cap_chars(&clean_text(text), max_chars)
}
