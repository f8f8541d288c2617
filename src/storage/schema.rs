//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Sumi-Index database.

/// SQL schema for the inverted index
pub const SCHEMA_SQL: &str = r#"
-- Every URL ever resolved, crawled or not
CREATE TABLE IF NOT EXISTS url (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    is_indexed INTEGER NOT NULL DEFAULT 0,
    indexed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_url_url ON url(url);

-- Dictionary of words; analytics is the native-script flag
CREATE TABLE IF NOT EXISTS word (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word TEXT NOT NULL UNIQUE,
    analytics INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_word_word ON word(word);

-- One row per word occurrence in a page body
CREATE TABLE IF NOT EXISTS word_to_url (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word_id INTEGER NOT NULL REFERENCES word(id),
    url_id INTEGER NOT NULL REFERENCES url(id),
    location INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_word_to_url_url ON word_to_url(url_id);
CREATE INDEX IF NOT EXISTS idx_word_to_url_word ON word_to_url(word_id);

-- Link relations between pages
CREATE TABLE IF NOT EXISTS url_to_url (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prev_url_id INTEGER NOT NULL REFERENCES url(id),
    next_url_id INTEGER NOT NULL REFERENCES url(id),
    UNIQUE(prev_url_id, next_url_id)
);

-- One row per word occurrence in an anchor text
CREATE TABLE IF NOT EXISTS word_to_link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    word_id INTEGER NOT NULL REFERENCES word(id),
    link_id INTEGER NOT NULL REFERENCES url_to_url(id)
);

CREATE INDEX IF NOT EXISTS idx_word_to_link_link ON word_to_link(link_id);
"#;

/// Drops every index table, children first
const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS word_to_link;
DROP TABLE IF EXISTS url_to_url;
DROP TABLE IF EXISTS word_to_url;
DROP TABLE IF EXISTS word;
DROP TABLE IF EXISTS url;
"#;

/// Names of all tables created by [`SCHEMA_SQL`]
pub const TABLES: &[&str] = &["url", "word", "word_to_url", "url_to_url", "word_to_link"];

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Drops all index tables and recreates them empty
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    initialize_schema(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count_tables(conn: &Connection, table: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in TABLES {
            assert_eq!(count_tables(&conn, table), 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_reset_clears_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute("INSERT INTO url (url) VALUES ('https://example.com/')", [])
            .unwrap();

        reset_schema(&conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM url", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
        for table in TABLES {
            assert_eq!(count_tables(&conn, table), 1);
        }
    }

    #[test]
    fn test_link_pair_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO url (url) VALUES ('https://a.example/'), ('https://b.example/');
             INSERT INTO url_to_url (prev_url_id, next_url_id) VALUES (1, 2);",
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO url_to_url (prev_url_id, next_url_id) VALUES (1, 2)",
            [],
        );
        assert!(duplicate.is_err());
    }
}
