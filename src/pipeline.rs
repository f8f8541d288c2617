//! Pipeline wiring
//!
//! One crawler task feeds two queues; a pool of page indexers drains the
//! page queue and a pool of link indexers drains the link queue. All tasks
//! share one store handle.
//!
//! The crawler stops when its frontier runs dry or the shutdown token
//! fires. Dropping its senders closes the queues, the workers drain what
//! is left and exit, and [`Pipeline::run`] collects their totals.

use crate::config::Config;
use crate::crawler::{CrawlStats, Crawler, Fetcher};
use crate::indexer::{LinkIndexer, PageIndexer, WorkerStats};
use crate::queue::work_queue;
use crate::storage::{SharedStorage, Storage};
use crate::IndexError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Totals of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Crawler counters; default if the crawler task failed
    pub crawl: CrawlStats,
    /// Summed page indexer counters
    pub pages: WorkerStats,
    /// Summed link indexer counters
    pub links: WorkerStats,
    /// Tasks that ended with an error or panicked
    pub task_failures: usize,
    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Returns true if every task finished without error
    pub fn is_clean(&self) -> bool {
        self.task_failures == 0
    }
}

/// The crawl and index pipeline
pub struct Pipeline<S> {
    config: Config,
    storage: SharedStorage<S>,
    fetcher: Arc<dyn Fetcher>,
}

impl<S> Pipeline<S>
where
    S: Storage + Send + 'static,
{
    /// Creates a pipeline over a store and a document source
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (seed, pool sizes, queue capacities)
    /// * `storage` - Shared store handle; keep a clone to inspect the index afterwards
    /// * `fetcher` - Source of documents
    pub fn new(config: Config, storage: SharedStorage<S>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            storage,
            fetcher,
        }
    }

    /// Runs the pipeline to completion or shutdown
    ///
    /// Task failures are counted in the report, not returned; an error is
    /// returned only if the pipeline cannot start.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<RunReport, IndexError> {
        let start_time = Instant::now();
        let (page_tx, page_rx) = work_queue("pages", self.config.queues.page_capacity);
        let (link_tx, link_rx) = work_queue("links", self.config.queues.link_capacity);

        let crawler = Crawler::new(
            &self.config.crawler.seed_url,
            Arc::clone(&self.fetcher),
            self.storage.clone(),
            page_tx,
            link_tx,
        )?;

        tracing::info!(
            "Starting pipeline: seed {}, {} page workers, {} link workers",
            self.config.crawler.seed_url,
            self.config.indexer.page_workers,
            self.config.indexer.link_workers
        );

        let page_workers: Vec<JoinHandle<Result<WorkerStats, IndexError>>> = (0..self
            .config
            .indexer
            .page_workers)
            .map(|id| tokio::spawn(PageIndexer::new(id, self.storage.clone(), page_rx.clone()).run()))
            .collect();
        let link_workers: Vec<JoinHandle<Result<WorkerStats, IndexError>>> = (0..self
            .config
            .indexer
            .link_workers)
            .map(|id| tokio::spawn(LinkIndexer::new(id, self.storage.clone(), link_rx.clone()).run()))
            .collect();

        // Only the workers hold receivers, so the crawler sees a closed
        // queue once a whole pool has died
        drop(page_rx);
        drop(link_rx);

        let crawl = tokio::spawn(crawler.run(shutdown));

        let mut report = RunReport::default();

        if let Some(stats) = settle("crawler", crawl.await, &mut report.task_failures) {
            report.crawl = stats;
        }
        for handle in page_workers {
            if let Some(stats) = settle("page indexer", handle.await, &mut report.task_failures) {
                report.pages.merge(stats);
            }
        }
        for handle in link_workers {
            if let Some(stats) = settle("link indexer", handle.await, &mut report.task_failures) {
                report.links.merge(stats);
            }
        }

        report.elapsed = start_time.elapsed();
        tracing::info!(
            "Pipeline finished in {:?}: {} pages crawled, {} pages indexed, {} links indexed, {} task failures",
            report.elapsed,
            report.crawl.pages_crawled,
            report.pages.indexed,
            report.links.indexed,
            report.task_failures
        );

        Ok(report)
    }
}

/// Unwraps a finished task, counting errors and panics as failures
fn settle<T>(
    task: &str,
    joined: Result<Result<T, IndexError>, JoinError>,
    failures: &mut usize,
) -> Option<T> {
    let outcome = match joined {
        Ok(result) => result,
        Err(e) => Err(IndexError::Task(e.to_string())),
    };

    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!("{} task failed: {}", task, e);
            *failures += 1;
            None
        }
    }
}
