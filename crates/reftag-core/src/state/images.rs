use chrono::Utc;
use rusqlite::{OptionalExtension, params, params_from_iter};

use crate::error::{RefTagError, Result};
use crate::models::{ImageFilter, ImagePatch, ImageRecord, ImageStatus, NewImage};
use crate::path::RecordFields;

use super::{SqliteStateStore, map_write_error};

type ImageRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
);

const IMAGE_COLUMNS: &str =
    "id, status, file_name, file_url, thumbnail_url, fields_json, created_at, updated_at";

fn read_image_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn image_from_row(row: ImageRow) -> Result<ImageRecord> {
    let (id, status, file_name, file_url, thumbnail_url, fields_json, created_at, updated_at) =
        row;
    let fields = parse_fields(&id, &fields_json)?;
    Ok(ImageRecord {
        status: status.parse::<ImageStatus>()?,
        id,
        file_name,
        file_url,
        thumbnail_url,
        fields,
        created_at,
        updated_at,
    })
}

fn parse_fields(id: &str, raw: &str) -> Result<RecordFields> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(fields) => Ok(fields),
        _ => Err(RefTagError::Validation(format!(
            "stored fields of image {id} are not an object"
        ))),
    }
}

impl SqliteStateStore {
    pub fn insert_image(&self, image: &NewImage) -> Result<ImageRecord> {
        let file_name = image.file_name.trim();
        if file_name.is_empty() {
            return Err(RefTagError::Validation(
                "image file_name must not be empty".to_string(),
            ));
        }
        let id = image
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), ToString::to_string);
        let status = image.status.unwrap_or_default();
        let now = Utc::now().to_rfc3339();
        let fields_json = serde_json::to_string(&image.fields)?;

        self.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO images(id, status, file_name, file_url, thumbnail_url, fields_json, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                ",
                params![
                    id,
                    status.as_str(),
                    file_name,
                    image.file_url,
                    image.thumbnail_url,
                    fields_json,
                    now
                ],
            )
            .map_err(|err| map_write_error(err, || format!("image {id} already exists")))?;
            Ok(())
        })?;

        Ok(ImageRecord {
            id,
            status,
            file_name: file_name.to_string(),
            file_url: image.file_url.clone(),
            thumbnail_url: image.thumbnail_url.clone(),
            fields: image.fields.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get_image(&self, id: &str) -> Result<Option<ImageRecord>> {
        let row = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = ?1"),
                    params![id],
                    read_image_row,
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(image_from_row).transpose()
    }

    pub fn list_images(&self, filter: &ImageFilter) -> Result<Vec<ImageRecord>> {
        let statuses = filter
            .statuses
            .as_ref()
            .map(|statuses| {
                statuses
                    .iter()
                    .map(|status| status.as_str())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if filter.statuses.is_some() && statuses.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.with_conn(|conn| {
            let sql = if statuses.is_empty() {
                format!("SELECT {IMAGE_COLUMNS} FROM images ORDER BY created_at ASC, id ASC")
            } else {
                let placeholders = (1..=statuses.len())
                    .map(|index| format!("?{index}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "SELECT {IMAGE_COLUMNS} FROM images WHERE status IN ({placeholders}) ORDER BY created_at ASC, id ASC"
                )
            };
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(statuses.iter()), read_image_row)?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })?;

        rows.into_iter().map(image_from_row).collect()
    }

    /// Replaces the top-level fields named in the patch and, optionally, the status.
    /// Read-modify-write runs in one transaction.
    pub fn apply_image_patch(&self, id: &str, patch: &ImagePatch) -> Result<ImageRecord> {
        let now = Utc::now().to_rfc3339();
        let row = self.with_tx(|tx| {
            let row = tx
                .query_row(
                    &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = ?1"),
                    params![id],
                    read_image_row,
                )
                .optional()?
                .ok_or_else(|| RefTagError::NotFound(format!("image {id}")))?;
            let mut image = image_from_row(row)?;
            if patch.is_empty() {
                return Ok(image);
            }

            for (key, value) in &patch.fields {
                image.fields.insert(key.clone(), value.clone());
            }
            if let Some(status) = patch.status {
                image.status = status;
            }
            image.updated_at = now.clone();

            tx.execute(
                "UPDATE images SET status = ?1, fields_json = ?2, updated_at = ?3 WHERE id = ?4",
                params![
                    image.status.as_str(),
                    serde_json::to_string(&image.fields)?,
                    now,
                    id
                ],
            )?;
            Ok(image)
        })?;
        Ok(row)
    }
}
