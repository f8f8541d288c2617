//! Storage module for the inverted index
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - URL identity resolution and the page indexed flag
//! - The word dictionary
//! - Word-to-URL and word-to-link relations
//! - Link relations between pages

mod schema;
mod shared;
mod sqlite;
mod traits;

pub use schema::TABLES;
pub use shared::SharedStorage;
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageError, StorageResult};

use crate::IndexError;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(IndexError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, IndexError> {
    SqliteStorage::new(path)
}

/// A URL identity: store-assigned id plus its normalized string form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
}

/// A dictionary word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    pub id: i64,
    pub word: String,
    /// Native-script classification, fixed at first insertion
    pub analytics: bool,
}

/// A persisted link relation between two pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub id: i64,
    pub prev_url_id: i64,
    pub next_url_id: i64,
}

/// Result of an indexing unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// Relations were written
    Indexed {
        /// Id of the indexed URL, or of the created link relation
        target_id: i64,
        /// Number of word relation rows written
        relations: usize,
    },

    /// The page or link was indexed before; nothing was written
    AlreadyIndexed,
}

impl IndexOutcome {
    /// Returns true if this unit of work wrote relations
    pub fn is_indexed(&self) -> bool {
        matches!(self, Self::Indexed { .. })
    }
}
