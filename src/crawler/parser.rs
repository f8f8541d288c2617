//! HTML parser for extracting page text and anchors
//!
//! This module handles parsing HTML content to extract:
//! - The visible plain text of the page
//! - Every `<a>` element with its href (if any) and its visible text

use scraper::{Html, Selector};
use url::Url;

/// Elements whose subtrees never contribute page text
const NON_CONTENT: &[&str] = &["head", "title", "style", "script", "noscript", "template"];

/// An anchor element as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// The raw href attribute, absolute or relative; `None` if missing
    pub href: Option<String>,

    /// The visible text of the anchor
    pub text: String,
}

/// Extracted content of an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Plain text with non-content elements removed
    pub text: String,

    /// All anchors, in document order
    pub anchors: Vec<Anchor>,
}

/// Parses HTML content and extracts its text and anchors
///
/// Text nodes inside `head`, `title`, `style`, `script`, `noscript` and
/// `template` are dropped; the rest are joined with single spaces.
///
/// # Example
///
/// ```
/// use sumi_index::crawler::parse_document;
///
/// let html = r#"<html><head><title>T</title></head>
///     <body>hello <a href="https://example.com/b">мир</a></body></html>"#;
/// let document = parse_document(html);
/// assert_eq!(document.anchors.len(), 1);
/// assert_eq!(document.anchors[0].text, "мир");
/// ```
pub fn parse_document(html: &str) -> Document {
    let document = Html::parse_document(html);

    Document {
        text: extract_text(&document),
        anchors: extract_anchors(&document),
    }
}

/// Collects the text nodes outside non-content elements
fn extract_text(document: &Html) -> String {
    let mut pieces: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| NON_CONTENT.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let text: &str = text;
        let text = text.trim();
        if !text.is_empty() {
            pieces.push(text);
        }
    }

    pieces.join(" ")
}

/// Extracts every `<a>` element in document order
fn extract_anchors(document: &Html) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    if let Ok(a_selector) = Selector::parse("a") {
        for element in document.select(&a_selector) {
            anchors.push(Anchor {
                href: element.value().attr("href").map(|href| href.trim().to_string()),
                text: element.text().collect::<String>().trim().to_string(),
            });
        }
    }

    anchors
}

/// Normalizes an absolute http(s) href
///
/// Returns `None` for relative hrefs and for any other scheme. The
/// fragment is removed; host case, default ports and dot segments are
/// normalized by the URL parser.
pub fn normalize_href(href: &str) -> Option<Url> {
    let mut url = Url::parse(href.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
