use chrono::Utc;
use rusqlite::{OptionalExtension, params};

use crate::error::{RefTagError, Result};
use crate::models::{NewTag, TagFilter, TagPatch, VocabularyTag};

use super::{
    SqliteStateStore, bool_to_i64, i64_to_u64_clamped, map_write_error, u64_to_i64_saturating,
};

const TAG_COLUMNS: &str = "id, category, tag_value, is_active, times_used, created_at, updated_at";

fn read_tag_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VocabularyTag> {
    Ok(VocabularyTag {
        id: row.get(0)?,
        category: row.get(1)?,
        tag_value: row.get(2)?,
        is_active: row.get::<_, i64>(3)? != 0,
        times_used: i64_to_u64_clamped(row.get(4)?),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

impl SqliteStateStore {
    pub fn create_tag(&self, tag: &NewTag) -> Result<VocabularyTag> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        self.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO vocabulary_tags(id, category, tag_value, is_active, times_used, created_at, updated_at)
                VALUES (?1, ?2, ?3, 1, ?4, ?5, ?5)
                ",
                params![
                    id,
                    tag.category,
                    tag.tag_value,
                    u64_to_i64_saturating(tag.times_used),
                    now
                ],
            )
            .map_err(|err| {
                map_write_error(err, || {
                    format!(
                        "active tag '{}' already exists in category '{}'",
                        tag.tag_value, tag.category
                    )
                })
            })?;
            Ok(())
        })?;

        Ok(VocabularyTag {
            id,
            category: tag.category.clone(),
            tag_value: tag.tag_value.clone(),
            is_active: true,
            times_used: tag.times_used,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get_tag(&self, id: &str) -> Result<Option<VocabularyTag>> {
        self.with_conn(|conn| {
            let tag = conn
                .query_row(
                    &format!("SELECT {TAG_COLUMNS} FROM vocabulary_tags WHERE id = ?1"),
                    params![id],
                    read_tag_row,
                )
                .optional()?;
            Ok(tag)
        })
    }

    pub fn find_active_tag(
        &self,
        category: &str,
        tag_value: &str,
    ) -> Result<Option<VocabularyTag>> {
        self.with_conn(|conn| {
            let tag = conn
                .query_row(
                    &format!(
                        "SELECT {TAG_COLUMNS} FROM vocabulary_tags WHERE category = ?1 AND tag_value = ?2 AND is_active = 1"
                    ),
                    params![category, tag_value],
                    read_tag_row,
                )
                .optional()?;
            Ok(tag)
        })
    }

    pub fn list_tags(&self, filter: &TagFilter) -> Result<Vec<VocabularyTag>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                r"
                SELECT {TAG_COLUMNS}
                FROM vocabulary_tags
                WHERE (?1 IS NULL OR category = ?1)
                  AND (?2 IS NULL OR is_active = ?2)
                ORDER BY category ASC, tag_value ASC, created_at ASC
                "
            ))?;
            let rows = stmt.query_map(
                params![filter.category, filter.is_active.map(bool_to_i64)],
                read_tag_row,
            )?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    pub fn apply_tag_patch(&self, id: &str, patch: &TagPatch) -> Result<VocabularyTag> {
        let now = Utc::now().to_rfc3339();
        self.with_tx(|tx| {
            let mut tag = tx
                .query_row(
                    &format!("SELECT {TAG_COLUMNS} FROM vocabulary_tags WHERE id = ?1"),
                    params![id],
                    read_tag_row,
                )
                .optional()?
                .ok_or_else(|| RefTagError::NotFound(format!("tag {id}")))?;

            if let Some(tag_value) = &patch.tag_value {
                tag.tag_value.clone_from(tag_value);
            }
            if let Some(is_active) = patch.is_active {
                tag.is_active = is_active;
            }
            if let Some(times_used) = patch.times_used {
                tag.times_used = times_used;
            }
            tag.updated_at.clone_from(&now);

            tx.execute(
                r"
                UPDATE vocabulary_tags
                SET tag_value = ?1, is_active = ?2, times_used = ?3, updated_at = ?4
                WHERE id = ?5
                ",
                params![
                    tag.tag_value,
                    bool_to_i64(tag.is_active),
                    u64_to_i64_saturating(tag.times_used),
                    now,
                    id
                ],
            )
            .map_err(|err| {
                map_write_error(err, || {
                    format!(
                        "active tag '{}' already exists in category '{}'",
                        tag.tag_value, tag.category
                    )
                })
            })?;
            Ok(tag)
        })
    }
}
