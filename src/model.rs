//! Work items passed from the crawler to the indexer workers

use crate::storage::UrlRecord;

/// A crawled page: its URL identity and extracted plain text
///
/// Produced once per crawl of a URL and consumed by exactly one page worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: UrlRecord,
    pub text: String,
}

/// An anchor found on a crawled page
///
/// Produced once per absolute anchor and consumed by exactly one link worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub source: UrlRecord,
    pub target: UrlRecord,
    pub text: String,
}
