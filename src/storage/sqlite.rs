//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//!
//! Rows keyed by a uniqueness constraint (`url.url`, `word.word`,
//! `url_to_url(prev_url_id, next_url_id)`) are all created through
//! [`insert_or_get`]: an `INSERT ... ON CONFLICT DO NOTHING` followed by a
//! read of the surviving row, so a concurrent duplicate insert always
//! resolves to the existing id instead of an error.

use crate::storage::schema::{initialize_schema, reset_schema};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{IndexOutcome, LinkRecord, UrlRecord, WordRecord};
use crate::text::Tokens;
use crate::IndexError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// A row identified by one of the schema's uniqueness constraints
#[derive(Debug, Clone, Copy)]
enum UniqueKey<'a> {
    Url(&'a str),
    Word { word: &'a str, analytics: bool },
    Link { prev_url_id: i64, next_url_id: i64 },
}

/// Inserts the row for `key` unless it exists, then returns its id
///
/// The boolean is true if this call created the row.
fn insert_or_get(conn: &Connection, key: UniqueKey<'_>) -> rusqlite::Result<(i64, bool)> {
    let inserted = match key {
        UniqueKey::Url(url) => conn
            .prepare_cached("INSERT INTO url (url) VALUES (?1) ON CONFLICT(url) DO NOTHING")?
            .execute(params![url])?,
        UniqueKey::Word { word, analytics } => conn
            .prepare_cached(
                "INSERT INTO word (word, analytics) VALUES (?1, ?2) ON CONFLICT(word) DO NOTHING",
            )?
            .execute(params![word, analytics])?,
        UniqueKey::Link {
            prev_url_id,
            next_url_id,
        } => conn
            .prepare_cached(
                "INSERT INTO url_to_url (prev_url_id, next_url_id) VALUES (?1, ?2)
                 ON CONFLICT(prev_url_id, next_url_id) DO NOTHING",
            )?
            .execute(params![prev_url_id, next_url_id])?,
    };

    let id = match key {
        UniqueKey::Url(url) => conn
            .prepare_cached("SELECT id FROM url WHERE url = ?1")?
            .query_row(params![url], |row| row.get(0))?,
        UniqueKey::Word { word, .. } => conn
            .prepare_cached("SELECT id FROM word WHERE word = ?1")?
            .query_row(params![word], |row| row.get(0))?,
        UniqueKey::Link {
            prev_url_id,
            next_url_id,
        } => conn
            .prepare_cached("SELECT id FROM url_to_url WHERE prev_url_id = ?1 AND next_url_id = ?2")?
            .query_row(params![prev_url_id, next_url_id], |row| row.get(0))?,
    };

    Ok((id, inserted > 0))
}

/// Upserts every distinct word of `tokens` and maps each to its id
fn upsert_words(conn: &Connection, tokens: &Tokens) -> rusqlite::Result<HashMap<String, i64>> {
    let mut ids = HashMap::with_capacity(tokens.len());
    for token in tokens.iter() {
        if ids.contains_key(token.word) {
            continue;
        }
        let (id, _) = insert_or_get(
            conn,
            UniqueKey::Word {
                word: token.word,
                analytics: token.native,
            },
        )?;
        ids.insert(token.word.to_string(), id);
    }
    Ok(ids)
}

/// Looks up the id of an already upserted word
fn word_id(ids: &HashMap<String, i64>, word: &str) -> StorageResult<i64> {
    ids.get(word).copied().ok_or_else(|| {
        StorageError::ConstraintViolation(format!("word '{}' missing after upsert", word))
    })
}

/// Sets the indexed flag and timestamp of a URL, returning the rows updated
fn set_page_indexed(conn: &Connection, url_id: i64) -> rusqlite::Result<usize> {
    conn.prepare_cached("UPDATE url SET is_indexed = 1, indexed_at = ?2 WHERE id = ?1")?
        .execute(params![url_id, Utc::now().to_rfc3339()])
}

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IndexError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl Storage for SqliteStorage {
    // ===== URL Store =====

    fn resolve_url(&mut self, url: &str) -> StorageResult<UrlRecord> {
        let (id, inserted) = insert_or_get(&self.conn, UniqueKey::Url(url))?;
        if inserted {
            tracing::trace!("New URL {} -> id {}", url, id);
        }
        Ok(UrlRecord {
            id,
            url: url.to_string(),
        })
    }

    fn get_url(&self, url_id: i64) -> StorageResult<UrlRecord> {
        self.conn
            .query_row(
                "SELECT id, url FROM url WHERE id = ?1",
                params![url_id],
                |row| {
                    Ok(UrlRecord {
                        id: row.get(0)?,
                        url: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or(StorageError::UrlNotFound(url_id))
    }

    fn is_page_indexed(&self, url_id: i64) -> StorageResult<bool> {
        self.conn
            .query_row(
                "SELECT is_indexed FROM url WHERE id = ?1",
                params![url_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StorageError::UrlNotFound(url_id))
    }

    fn mark_page_indexed(&mut self, url_id: i64) -> StorageResult<()> {
        if set_page_indexed(&self.conn, url_id)? == 0 {
            return Err(StorageError::UrlNotFound(url_id));
        }
        Ok(())
    }

    fn link_identity(&self, prev_url_id: i64, next_url_id: i64) -> StorageResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM url_to_url WHERE prev_url_id = ?1 AND next_url_id = ?2",
                params![prev_url_id, next_url_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    // ===== Words =====

    fn insert_or_get_words(&mut self, tokens: &Tokens) -> StorageResult<HashMap<String, i64>> {
        let tx = self.conn.transaction()?;
        let ids = upsert_words(&tx, tokens)?;
        tx.commit()?;
        Ok(ids)
    }

    fn get_word(&self, word: &str) -> StorageResult<Option<WordRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, word, analytics FROM word WHERE word = ?1",
                params![word],
                |row| {
                    Ok(WordRecord {
                        id: row.get(0)?,
                        word: row.get(1)?,
                        analytics: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    // ===== Indexing =====

    fn index_page(&mut self, url_id: i64, tokens: &Tokens) -> StorageResult<IndexOutcome> {
        let tx = self.conn.transaction()?;

        let indexed: bool = tx
            .query_row(
                "SELECT is_indexed FROM url WHERE id = ?1",
                params![url_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(StorageError::UrlNotFound(url_id))?;
        if indexed {
            return Ok(IndexOutcome::AlreadyIndexed);
        }

        // Rows without the flag belong to an interrupted earlier attempt
        let stale = tx.execute("DELETE FROM word_to_url WHERE url_id = ?1", params![url_id])?;
        if stale > 0 {
            tracing::warn!(
                "Discarded {} stale word relations of unindexed URL id {}",
                stale,
                url_id
            );
        }

        let ids = upsert_words(&tx, tokens)?;
        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO word_to_url (word_id, url_id, location) VALUES (?1, ?2, ?3)",
            )?;
            for token in tokens.iter() {
                insert.execute(params![word_id(&ids, token.word)?, url_id, token.position])?;
            }
        }

        // The flag is written last, inside the same transaction
        set_page_indexed(&tx, url_id)?;
        tx.commit()?;

        Ok(IndexOutcome::Indexed {
            target_id: url_id,
            relations: tokens.len(),
        })
    }

    fn index_link(
        &mut self,
        prev_url_id: i64,
        next_url_id: i64,
        tokens: &Tokens,
    ) -> StorageResult<IndexOutcome> {
        let tx = self.conn.transaction()?;

        let (link_id, created) = insert_or_get(
            &tx,
            UniqueKey::Link {
                prev_url_id,
                next_url_id,
            },
        )?;
        if !created {
            return Ok(IndexOutcome::AlreadyIndexed);
        }

        let ids = upsert_words(&tx, tokens)?;
        {
            let mut insert =
                tx.prepare_cached("INSERT INTO word_to_link (word_id, link_id) VALUES (?1, ?2)")?;
            for token in tokens.iter() {
                insert.execute(params![word_id(&ids, token.word)?, link_id])?;
            }
        }
        tx.commit()?;

        Ok(IndexOutcome::Indexed {
            target_id: link_id,
            relations: tokens.len(),
        })
    }

    fn get_link(&self, prev_url_id: i64, next_url_id: i64) -> StorageResult<Option<LinkRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, prev_url_id, next_url_id FROM url_to_url
                 WHERE prev_url_id = ?1 AND next_url_id = ?2",
                params![prev_url_id, next_url_id],
                |row| {
                    Ok(LinkRecord {
                        id: row.get(0)?,
                        prev_url_id: row.get(1)?,
                        next_url_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn reset(&mut self) -> StorageResult<()> {
        reset_schema(&self.conn)?;
        Ok(())
    }

    // ===== Statistics =====

    fn count_urls(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM url", [])
    }

    fn count_indexed_urls(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM url WHERE is_indexed = 1", [])
    }

    fn count_words(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM word", [])
    }

    fn count_native_words(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM word WHERE analytics = 1", [])
    }

    fn count_word_to_url(&self, url_id: Option<i64>) -> StorageResult<u64> {
        match url_id {
            Some(id) => self.count(
                "SELECT COUNT(*) FROM word_to_url WHERE url_id = ?1",
                params![id],
            ),
            None => self.count("SELECT COUNT(*) FROM word_to_url", []),
        }
    }

    fn count_links(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM url_to_url", [])
    }

    fn count_word_to_link(&self, link_id: Option<i64>) -> StorageResult<u64> {
        match link_id {
            Some(id) => self.count(
                "SELECT COUNT(*) FROM word_to_link WHERE link_id = ?1",
                params![id],
            ),
            None => self.count("SELECT COUNT(*) FROM word_to_link", []),
        }
    }
}
