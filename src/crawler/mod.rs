//! Crawler module for web page fetching and processing
//!
//! This module contains the crawling side of the pipeline:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML parsing into page text and anchors
//! - The private pending-URL frontier
//! - The crawl loop feeding the page and link queues

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{CrawlStats, Crawler};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{normalize_href, parse_document, Anchor, Document};
