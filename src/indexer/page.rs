//! Page indexer worker

use crate::indexer::WorkerStats;
use crate::model::Page;
use crate::queue::QueueReceiver;
use crate::storage::{IndexOutcome, SharedStorage, Storage};
use crate::text::tokenize;
use crate::IndexError;

/// Consumes pages and writes their word-to-URL relations
pub struct PageIndexer<S> {
    id: usize,
    storage: SharedStorage<S>,
    pages: QueueReceiver<Page>,
}

impl<S: Storage> PageIndexer<S> {
    pub fn new(id: usize, storage: SharedStorage<S>, pages: QueueReceiver<Page>) -> Self {
        Self { id, storage, pages }
    }

    /// Runs until the page queue is closed and drained
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerStats)` - Totals for this worker
    /// * `Err(IndexError)` - A store operation failed; the worker stopped
    pub async fn run(self) -> Result<WorkerStats, IndexError> {
        tracing::debug!("Page indexer {} started", self.id);
        let mut stats = WorkerStats::default();

        while let Some(page) = self.pages.recv().await {
            if let Err(e) = self.index(&page, &mut stats) {
                tracing::error!("Page indexer {} failed on {}: {}", self.id, page.url.url, e);
                return Err(e);
            }
        }

        tracing::info!(
            "Page indexer {} finished: {} pages indexed, {} already indexed",
            self.id,
            stats.indexed,
            stats.skipped
        );
        Ok(stats)
    }

    fn index(&self, page: &Page, stats: &mut WorkerStats) -> Result<(), IndexError> {
        if self.storage.is_page_indexed(page.url.id)? {
            tracing::debug!("Page {} already indexed, skipping", page.url.url);
            stats.skipped += 1;
            return Ok(());
        }

        let tokens = tokenize(&page.text);

        // A concurrent worker may have won since the check above
        match self.storage.index_page(page.url.id, &tokens)? {
            IndexOutcome::Indexed { relations, .. } => {
                tracing::debug!("Indexed page {} ({} words)", page.url.url, relations);
                stats.indexed += 1;
            }
            IndexOutcome::AlreadyIndexed => {
                tracing::debug!("Page {} already indexed, skipping", page.url.url);
                stats.skipped += 1;
            }
        }

        Ok(())
    }
}
