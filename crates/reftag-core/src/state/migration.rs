use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{RefTagError, Result};

use super::SqliteStateStore;

const MIGRATION_SCHEMA_SQL: &str = r"
    PRAGMA journal_mode = WAL;
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS vocabulary_configs (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        categories_json TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_vocabulary_configs_single_active
    ON vocabulary_configs(is_active) WHERE is_active = 1;

    CREATE TABLE IF NOT EXISTS images (
        id TEXT PRIMARY KEY,
        status TEXT NOT NULL CHECK(status IN ('pending', 'tagged', 'approved', 'skipped')),
        file_name TEXT NOT NULL,
        file_url TEXT,
        thumbnail_url TEXT,
        fields_json TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_images_status_created_at
    ON images(status, created_at);

    CREATE TABLE IF NOT EXISTS vocabulary_tags (
        id TEXT PRIMARY KEY,
        category TEXT NOT NULL,
        tag_value TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        times_used INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_vocabulary_tags_active_value
    ON vocabulary_tags(category, tag_value) WHERE is_active = 1;

    CREATE INDEX IF NOT EXISTS idx_vocabulary_tags_category
    ON vocabulary_tags(category, is_active);
";

impl SqliteStateStore {
    pub fn migrate(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RefTagError::mutex_poisoned("sqlite"))?;
        conn.execute_batch(MIGRATION_SCHEMA_SQL)?;
        ensure_required_column(
            &conn,
            "images",
            "fields_json",
            "unsupported images schema: fields_json is missing; reset the state database",
        )?;
        ensure_required_column(
            &conn,
            "vocabulary_tags",
            "times_used",
            "unsupported vocabulary_tags schema: times_used is missing; reset the state database",
        )?;
        if !has_index(&conn, "idx_vocabulary_tags_active_value")? {
            return Err(RefTagError::Validation(
                "vocabulary tag uniqueness index is missing; reset the state database"
                    .to_string(),
            ));
        }
        drop(conn);
        Ok(())
    }
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for row in rows {
        if row? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn has_index(conn: &Connection, index: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1 LIMIT 1",
            params![index],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    Ok(exists)
}

fn ensure_required_column(
    conn: &Connection,
    table: &str,
    column: &str,
    error_message: &'static str,
) -> Result<()> {
    if has_column(conn, table, column)? {
        Ok(())
    } else {
        Err(RefTagError::Validation(error_message.to_string()))
    }
}
