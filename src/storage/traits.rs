//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{IndexOutcome, LinkRecord, UrlRecord, WordRecord};
use crate::text::Tokens;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned by a panicking task")]
    LockPoisoned,

    #[error("URL not found: id {0}")]
    UrlNotFound(i64),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Identity assignment is owned entirely by the backend: callers never mint
/// ids, they only receive them from `resolve_url`, `insert_or_get_words` and
/// the indexing operations.
pub trait Storage {
    // ===== URL Store =====

    /// Looks up a URL by exact string match, inserting it if absent
    ///
    /// Resolving the same string any number of times yields the same id.
    fn resolve_url(&mut self, url: &str) -> StorageResult<UrlRecord>;

    /// Gets a URL row by id
    fn get_url(&self, url_id: i64) -> StorageResult<UrlRecord>;

    /// Returns true once the page behind this URL has been indexed
    fn is_page_indexed(&self, url_id: i64) -> StorageResult<bool>;

    /// Sets the indexed flag of a URL
    fn mark_page_indexed(&mut self, url_id: i64) -> StorageResult<()>;

    /// Gets the id of the persisted link relation for a (source, target) pair
    fn link_identity(&self, prev_url_id: i64, next_url_id: i64) -> StorageResult<Option<i64>>;

    /// Returns true if a link relation exists for the (source, target) pair
    fn link_exists(&self, prev_url_id: i64, next_url_id: i64) -> StorageResult<bool> {
        Ok(self.link_identity(prev_url_id, next_url_id)?.is_some())
    }

    // ===== Words =====

    /// Inserts every word of `tokens` not yet in the dictionary and returns
    /// the ids of all of them
    ///
    /// Existing words keep their id and classification.
    fn insert_or_get_words(&mut self, tokens: &Tokens) -> StorageResult<HashMap<String, i64>>;

    /// Gets a word by its exact text
    fn get_word(&self, word: &str) -> StorageResult<Option<WordRecord>>;

    // ===== Indexing =====

    /// Writes the word-to-URL relations of a page and marks it indexed
    ///
    /// Runs as one unit of work. Returns `AlreadyIndexed` without writing
    /// anything if the indexed flag is already set.
    fn index_page(&mut self, url_id: i64, tokens: &Tokens) -> StorageResult<IndexOutcome>;

    /// Creates the link relation and its word-to-link rows
    ///
    /// Runs as one unit of work. Returns `AlreadyIndexed` without writing
    /// anything if the relation already exists.
    fn index_link(
        &mut self,
        prev_url_id: i64,
        next_url_id: i64,
        tokens: &Tokens,
    ) -> StorageResult<IndexOutcome>;

    /// Gets the link relation for a (source, target) pair
    fn get_link(&self, prev_url_id: i64, next_url_id: i64) -> StorageResult<Option<LinkRecord>>;

    /// Drops and recreates all index tables
    fn reset(&mut self) -> StorageResult<()>;

    // ===== Statistics =====

    /// Counts rows of the `url` table
    fn count_urls(&self) -> StorageResult<u64>;

    /// Counts URLs whose page has been indexed
    fn count_indexed_urls(&self) -> StorageResult<u64>;

    /// Counts dictionary words
    fn count_words(&self) -> StorageResult<u64>;

    /// Counts dictionary words classified as native-script
    fn count_native_words(&self) -> StorageResult<u64>;

    /// Counts word-to-URL relations, optionally for one URL only
    fn count_word_to_url(&self, url_id: Option<i64>) -> StorageResult<u64>;

    /// Counts link relations
    fn count_links(&self) -> StorageResult<u64>;

    /// Counts word-to-link relations, optionally for one link only
    fn count_word_to_link(&self, link_id: Option<i64>) -> StorageResult<u64>;
}
