//! Indexer worker pools
//!
//! Page workers and link workers run the same consume loop over their own
//! queue: take an item, skip it if its index rows already exist, otherwise
//! tokenize its text and write the rows as one unit of work. Any number of
//! workers may share a queue and the store.
//!
//! A store failure ends the worker that hit it; the other workers keep
//! consuming.

mod link;
mod page;

pub use link::LinkIndexer;
pub use page::PageIndexer;

/// Per-worker counters returned when a worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Items whose index rows this worker wrote
    pub indexed: u64,
    /// Items found already indexed
    pub skipped: u64,
}

impl WorkerStats {
    /// Adds another worker's counters to these
    pub fn merge(&mut self, other: WorkerStats) {
        self.indexed += other.indexed;
        self.skipped += other.skipped;
    }
}
