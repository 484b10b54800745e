use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use crate::error::{RefTagError, Result};
use crate::models::{Category, VocabularyConfig, VocabularyConfigSummary};

use super::{SqliteStateStore, bool_to_i64};

type ConfigRow = (String, String, String, i64, String, String);

const CONFIG_COLUMNS: &str = "id, name, categories_json, is_active, created_at, updated_at";

fn read_config_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConfigRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn config_from_row(row: ConfigRow) -> Result<VocabularyConfig> {
    let (id, name, categories_json, is_active, created_at, updated_at) = row;
    let categories = serde_json::from_str::<Vec<Category>>(&categories_json).map_err(|err| {
        RefTagError::Validation(format!("stored vocabulary config {id} is unreadable: {err}"))
    })?;
    Ok(VocabularyConfig {
        id,
        name,
        categories,
        is_active: is_active != 0,
        created_at,
        updated_at,
    })
}

impl SqliteStateStore {
    /// Stores a validated category list. With `activate`, every other configuration is
    /// deactivated in the same transaction.
    pub fn insert_vocabulary_config(
        &self,
        name: &str,
        categories: &[Category],
        activate: bool,
    ) -> Result<VocabularyConfig> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let categories_json = serde_json::to_string(categories)?;
        self.with_tx(|tx| {
            if activate {
                tx.execute(
                    "UPDATE vocabulary_configs SET is_active = 0, updated_at = ?1 WHERE is_active = 1",
                    params![now],
                )?;
            }
            tx.execute(
                r"
                INSERT INTO vocabulary_configs(id, name, categories_json, is_active, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                ",
                params![id, name, categories_json, bool_to_i64(activate), now],
            )?;
            Ok(())
        })?;

        Ok(VocabularyConfig {
            id,
            name: name.to_string(),
            categories: categories.to_vec(),
            is_active: activate,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn activate_vocabulary_config(&self, id: &str) -> Result<VocabularyConfig> {
        let now = Utc::now().to_rfc3339();
        self.with_tx(|tx| {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM vocabulary_configs WHERE id = ?1",
                    params![id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Err(RefTagError::NotFound(format!("vocabulary config {id}")));
            }
            tx.execute(
                "UPDATE vocabulary_configs SET is_active = 0, updated_at = ?1 WHERE is_active = 1 AND id != ?2",
                params![now, id],
            )?;
            tx.execute(
                "UPDATE vocabulary_configs SET is_active = 1, updated_at = ?1 WHERE id = ?2",
                params![now, id],
            )?;
            Ok(())
        })?;

        self.get_vocabulary_config(id)?
            .ok_or_else(|| RefTagError::NotFound(format!("vocabulary config {id}")))
    }

    pub fn get_vocabulary_config(&self, id: &str) -> Result<Option<VocabularyConfig>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {CONFIG_COLUMNS} FROM vocabulary_configs WHERE id = ?1"),
                    params![id],
                    read_config_row,
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(config_from_row).transpose()
    }

    pub fn active_vocabulary_config(&self) -> Result<Option<VocabularyConfig>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {CONFIG_COLUMNS} FROM vocabulary_configs WHERE is_active = 1 LIMIT 1"
                    ),
                    [],
                    read_config_row,
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(config_from_row).transpose()
    }

    pub fn list_vocabulary_configs(&self) -> Result<Vec<VocabularyConfigSummary>> {
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONFIG_COLUMNS} FROM vocabulary_configs ORDER BY created_at ASC, id ASC"
            ))?;
            let rows = stmt.query_map([], read_config_row)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let config = config_from_row(row)?;
            out.push(VocabularyConfigSummary {
                id: config.id,
                name: config.name,
                category_count: config.categories.len(),
                is_active: config.is_active,
                updated_at: config.updated_at,
            });
        }
        Ok(out)
    }
}
