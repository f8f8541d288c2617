//! Crawler coordinator - the crawl loop
//!
//! The crawler pulls one URL at a time off its private frontier, fetches
//! it, and hands the results to the indexers:
//! - one [`Page`] per fetched document onto the page queue
//! - one [`Link`] per absolute anchor onto the link queue
//! - every link target back onto the frontier
//!
//! A failed fetch is logged and skipped. Store and queue failures end the
//! loop with an error.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{normalize_href, Document};
use crate::model::{Link, Page};
use crate::queue::QueueSender;
use crate::storage::{SharedStorage, Storage};
use crate::{ConfigError, IndexError};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Counters reported when the crawl loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Documents fetched and handed to the indexers
    pub pages_crawled: u64,
    /// URLs whose fetch failed
    pub fetch_failures: u64,
    /// Links queued for indexing
    pub links_queued: u64,
    /// Anchors without an href or with a relative one
    pub anchors_skipped: u64,
}

/// Single-task crawl loop feeding the page and link queues
pub struct Crawler<S> {
    fetcher: Arc<dyn Fetcher>,
    storage: SharedStorage<S>,
    frontier: Frontier,
    pages: QueueSender<Page>,
    links: QueueSender<Link>,
}

impl<S: Storage> Crawler<S> {
    /// Creates a crawler whose frontier holds only the seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute http(s) URL to start from
    /// * `fetcher` - Source of documents
    /// * `storage` - Shared store used to resolve URL identities
    /// * `pages` - Producer side of the page queue
    /// * `links` - Producer side of the link queue
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Crawler ready to run
    /// * `Err(IndexError)` - The seed is not an absolute http(s) URL
    pub fn new(
        seed: &str,
        fetcher: Arc<dyn Fetcher>,
        storage: SharedStorage<S>,
        pages: QueueSender<Page>,
        links: QueueSender<Link>,
    ) -> Result<Self, IndexError> {
        let seed = normalize_href(seed)
            .ok_or_else(|| ConfigError::InvalidUrl(format!("seed URL {} is not absolute", seed)))?;

        Ok(Self {
            fetcher,
            storage,
            frontier: Frontier::new(seed.as_str()),
            pages,
            links,
        })
    }

    /// Runs the crawl loop
    ///
    /// Returns when the frontier is empty or `shutdown` fires. The queue
    /// senders are dropped on return, which closes both queues once every
    /// other sender is gone.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<CrawlStats, IndexError> {
        tracing::info!("Crawler started");

        let mut stats = CrawlStats::default();
        let start_time = Instant::now();

        loop {
            if shutdown.is_cancelled() {
                tracing::info!("Shutdown requested, crawler stopping");
                break;
            }

            let url = match self.frontier.pop() {
                Some(url) => url,
                None => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::debug!("Processing URL: {}", url);

            let fetched = tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested while fetching {}", url);
                    break;
                }
                result = self.fetcher.fetch(&url) => result,
            };

            let document = match fetched {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", url, e);
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            self.process_document(&url, document, &mut stats).await?;
            stats.pages_crawled += 1;

            if stats.pages_crawled % 10 == 0 {
                let rate = stats.pages_crawled as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    stats.pages_crawled,
                    self.frontier.len(),
                    rate
                );
            }
        }

        tracing::info!(
            "Crawl finished: {} pages crawled, {} fetch failures, {} links queued in {:?}",
            stats.pages_crawled,
            stats.fetch_failures,
            stats.links_queued,
            start_time.elapsed()
        );

        Ok(stats)
    }

    /// Emits the page and its links, and grows the frontier
    async fn process_document(
        &mut self,
        url: &str,
        document: Document,
        stats: &mut CrawlStats,
    ) -> Result<(), IndexError> {
        let source = self.storage.resolve(url)?;
        let text_len = document.text.chars().count();

        self.pages
            .send(Page {
                url: source.clone(),
                text: document.text,
            })
            .await?;

        let mut queued = 0;
        let mut skipped = 0;

        for anchor in document.anchors {
            let Some(href) = anchor.href.as_deref() else {
                tracing::debug!("Skipping anchor without href on {}", url);
                skipped += 1;
                continue;
            };

            let Some(target) = normalize_href(href) else {
                tracing::debug!("Skipping non-absolute href {} on {}", href, url);
                skipped += 1;
                continue;
            };

            let target = self.storage.resolve(target.as_str())?;
            self.frontier.push(target.url.clone());
            self.links
                .send(Link {
                    source: source.clone(),
                    target,
                    text: anchor.text,
                })
                .await?;
            queued += 1;
        }

        tracing::info!(
            "Crawled {}: {} chars, {} links queued, {} anchors skipped",
            url,
            text_len,
            queued,
            skipped
        );

        stats.links_queued += queued;
        stats.anchors_skipped += skipped;
        Ok(())
    }
}
