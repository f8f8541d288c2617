//! Shared handle to a storage backend
//!
//! Every pipeline task reaches the store through a [`SharedStorage`]. The
//! backend sits behind one mutex, so each call below is a short critical
//! section and a check-then-write performed inside one backend call is
//! serialized against every other task.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{IndexOutcome, UrlRecord};
use crate::text::Tokens;
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, thread-safe handle to a storage backend
pub struct SharedStorage<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedStorage<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Storage> SharedStorage<S> {
    /// Wraps a backend for sharing between tasks
    pub fn new(storage: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(storage)),
        }
    }

    /// Locks the backend for a sequence of operations
    pub fn lock(&self) -> StorageResult<MutexGuard<'_, S>> {
        self.inner.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Resolves a URL string to its identity, inserting it on first sight
    pub fn resolve(&self, url: &str) -> StorageResult<UrlRecord> {
        self.lock()?.resolve_url(url)
    }

    /// Gets the persisted link relation id for a (source, target) pair
    pub fn link_identity(&self, source_id: i64, target_id: i64) -> StorageResult<Option<i64>> {
        self.lock()?.link_identity(source_id, target_id)
    }

    /// Returns true once the page behind `url_id` has been indexed
    pub fn is_page_indexed(&self, url_id: i64) -> StorageResult<bool> {
        self.lock()?.is_page_indexed(url_id)
    }

    /// Sets the indexed flag of a URL
    pub fn mark_page_indexed(&self, url_id: i64) -> StorageResult<()> {
        self.lock()?.mark_page_indexed(url_id)
    }

    /// Returns true if a link relation exists for the (source, target) pair
    pub fn link_exists(&self, source_id: i64, target_id: i64) -> StorageResult<bool> {
        self.lock()?.link_exists(source_id, target_id)
    }

    /// Indexes a page body as one unit of work
    pub fn index_page(&self, url_id: i64, tokens: &Tokens) -> StorageResult<IndexOutcome> {
        self.lock()?.index_page(url_id, tokens)
    }

    /// Indexes an anchor text as one unit of work
    pub fn index_link(
        &self,
        source_id: i64,
        target_id: i64,
        tokens: &Tokens,
    ) -> StorageResult<IndexOutcome> {
        self.lock()?.index_link(source_id, target_id, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use crate::text::tokenize;
    use std::thread;

    fn shared() -> SharedStorage<SqliteStorage> {
        SharedStorage::new(SqliteStorage::new_in_memory().unwrap())
    }

    #[test]
    fn test_concurrent_resolve_yields_one_row() {
        let storage = shared();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let storage = storage.clone();
                thread::spawn(move || storage.resolve("https://example.com/new").unwrap().id)
            })
            .collect();
        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(storage.lock().unwrap().count_urls().unwrap(), 1);
    }

    #[test]
    fn test_concurrent_page_indexing_writes_once() {
        let storage = shared();
        let url_id = storage.resolve("https://example.com/").unwrap().id;

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let storage = storage.clone();
                thread::spawn(move || {
                    storage
                        .index_page(url_id, &tokenize("hello мир again"))
                        .unwrap()
                })
            })
            .collect();
        let indexed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| outcome.is_indexed())
            .count();

        assert_eq!(indexed, 1);
        assert_eq!(
            storage.lock().unwrap().count_word_to_url(Some(url_id)).unwrap(),
            3
        );
    }

    #[test]
    fn test_concurrent_link_indexing_writes_once() {
        let storage = shared();
        let a = storage.resolve("https://a.example/").unwrap().id;
        let b = storage.resolve("https://b.example/").unwrap().id;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let storage = storage.clone();
                thread::spawn(move || storage.index_link(a, b, &tokenize("мир")).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let link_id = storage.link_identity(a, b).unwrap().unwrap();
        let guard = storage.lock().unwrap();
        assert_eq!(guard.count_links().unwrap(), 1);
        assert_eq!(guard.count_word_to_link(Some(link_id)).unwrap(), 1);
    }

    #[test]
    fn test_mark_page_indexed_through_handle() {
        let storage = shared();
        let url = storage.resolve("https://example.com/").unwrap();

        assert!(!storage.is_page_indexed(url.id).unwrap());
        storage.mark_page_indexed(url.id).unwrap();
        assert!(storage.is_page_indexed(url.id).unwrap());
        assert!(!storage.link_exists(url.id, url.id).unwrap());
    }
}
