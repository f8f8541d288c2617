//! Link indexer worker

use crate::indexer::WorkerStats;
use crate::model::Link;
use crate::queue::QueueReceiver;
use crate::storage::{IndexOutcome, SharedStorage, Storage};
use crate::text::tokenize;
use crate::IndexError;

/// Consumes links and writes the link relation plus its word-to-link rows
///
/// The link relation itself marks a link as indexed. It is created in the
/// same transaction as its word rows, so a half-written link never exists.
pub struct LinkIndexer<S> {
    id: usize,
    storage: SharedStorage<S>,
    links: QueueReceiver<Link>,
}

impl<S: Storage> LinkIndexer<S> {
    pub fn new(id: usize, storage: SharedStorage<S>, links: QueueReceiver<Link>) -> Self {
        Self { id, storage, links }
    }

    /// Runs until the link queue is closed and drained
    pub async fn run(self) -> Result<WorkerStats, IndexError> {
        tracing::debug!("Link indexer {} started", self.id);
        let mut stats = WorkerStats::default();

        while let Some(link) = self.links.recv().await {
            if let Err(e) = self.index(&link, &mut stats) {
                tracing::error!(
                    "Link indexer {} failed on {} -> {}: {}",
                    self.id,
                    link.source.url,
                    link.target.url,
                    e
                );
                return Err(e);
            }
        }

        tracing::info!(
            "Link indexer {} finished: {} links indexed, {} already indexed",
            self.id,
            stats.indexed,
            stats.skipped
        );
        Ok(stats)
    }

    fn index(&self, link: &Link, stats: &mut WorkerStats) -> Result<(), IndexError> {
        if self.storage.link_exists(link.source.id, link.target.id)? {
            tracing::debug!(
                "Link {} -> {} already indexed, skipping",
                link.source.url,
                link.target.url
            );
            stats.skipped += 1;
            return Ok(());
        }

        let tokens = tokenize(&link.text);

        match self
            .storage
            .index_link(link.source.id, link.target.id, &tokens)?
        {
            IndexOutcome::Indexed {
                target_id,
                relations,
            } => {
                tracing::debug!(
                    "Indexed link {} ({} -> {}, {} words)",
                    target_id,
                    link.source.url,
                    link.target.url,
                    relations
                );
                stats.indexed += 1;
            }
            IndexOutcome::AlreadyIndexed => {
                tracing::debug!(
                    "Link {} -> {} already indexed, skipping",
                    link.source.url,
                    link.target.url
                );
                stats.skipped += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::work_queue;
    use crate::storage::{SqliteStorage, UrlRecord};

    struct Fixture {
        storage: SharedStorage<SqliteStorage>,
        a: UrlRecord,
        b: UrlRecord,
    }

    fn fixture() -> Fixture {
        let storage = SharedStorage::new(SqliteStorage::new_in_memory().unwrap());
        let a = storage.resolve("https://a.example/").unwrap();
        let b = storage.resolve("https://b.example/").unwrap();
        Fixture { storage, a, b }
    }

    fn link(source: &UrlRecord, target: &UrlRecord, text: &str) -> Link {
        Link {
            source: source.clone(),
            target: target.clone(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_indexes_anchor_words() {
        let f = fixture();
        let (tx, rx) = work_queue("links", None);
        tx.send(link(&f.a, &f.b, "мир")).await.unwrap();
        drop(tx);

        let stats = LinkIndexer::new(0, f.storage.clone(), rx).run().await.unwrap();
        assert_eq!(stats.indexed, 1);

        let guard = f.storage.lock().unwrap();
        let record = guard.get_link(f.a.id, f.b.id).unwrap().unwrap();
        assert_eq!(guard.count_word_to_link(Some(record.id)).unwrap(), 1);
        assert!(guard.get_word("мир").unwrap().unwrap().analytics);
        // Link text never produces word-to-URL rows
        assert_eq!(guard.count_word_to_url(None).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_same_pair_indexed_once() {
        let f = fixture();
        let (tx, rx) = work_queue("links", None);
        tx.send(link(&f.a, &f.b, "first text")).await.unwrap();
        tx.send(link(&f.a, &f.b, "other anchor text")).await.unwrap();
        drop(tx);

        let stats = LinkIndexer::new(0, f.storage.clone(), rx).run().await.unwrap();
        assert_eq!(
            stats,
            WorkerStats {
                indexed: 1,
                skipped: 1
            }
        );

        let guard = f.storage.lock().unwrap();
        assert_eq!(guard.count_links().unwrap(), 1);
        assert_eq!(guard.count_word_to_link(None).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_write_once() {
        let f = fixture();
        let (tx, rx) = work_queue("links", None);
        for _ in 0..10 {
            tx.send(link(&f.a, &f.b, "anchor")).await.unwrap();
            tx.send(link(&f.b, &f.a, "back")).await.unwrap();
        }
        drop(tx);

        let workers: Vec<_> = (0..3)
            .map(|id| tokio::spawn(LinkIndexer::new(id, f.storage.clone(), rx.clone()).run()))
            .collect();

        let mut total = WorkerStats::default();
        for worker in workers {
            total.merge(worker.await.unwrap().unwrap());
        }

        assert_eq!(total.indexed, 2);
        assert_eq!(total.skipped, 18);
        let guard = f.storage.lock().unwrap();
        assert_eq!(guard.count_links().unwrap(), 2);
        assert_eq!(guard.count_word_to_link(None).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_anchor_text_still_creates_link() {
        let f = fixture();
        let (tx, rx) = work_queue("links", None);
        tx.send(link(&f.a, &f.b, "")).await.unwrap();
        drop(tx);

        LinkIndexer::new(0, f.storage.clone(), rx).run().await.unwrap();

        let guard = f.storage.lock().unwrap();
        assert!(guard.link_exists(f.a.id, f.b.id).unwrap());
        assert_eq!(guard.count_word_to_link(None).unwrap(), 0);
    }
}
