use std::path::Path;
#[cfg(unix)]
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::error::{RefTagError, Result};
use crate::models::{
    ImageFilter, ImagePatch, ImageRecord, NewTag, TagFilter, TagPatch, VocabularyConfig,
    VocabularyTag,
};
use crate::store::{ImageCorpus, TagStore, VocabularyStore};

mod images;
mod migration;
mod tags;
mod vocabulary;

#[derive(Clone)]
pub struct SqliteStateStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStateStore").finish_non_exhaustive()
    }
}

impl SqliteStateStore {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| RefTagError::mutex_poisoned("sqlite"))?;
        f(&conn)
    }

    fn with_tx<T>(&self, f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| RefTagError::mutex_poisoned("sqlite"))?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        drop(conn);
        Ok(value)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        #[cfg(unix)]
        harden_sqlite_permissions(path)?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(Connection::open_in_memory()?)),
        };
        store.migrate()?;
        Ok(store)
    }
}

impl VocabularyStore for SqliteStateStore {
    fn fetch_active_vocabulary_config(&self) -> Result<Option<VocabularyConfig>> {
        self.active_vocabulary_config()
    }
}

impl ImageCorpus for SqliteStateStore {
    fn fetch_images(&self, filter: &ImageFilter) -> Result<Vec<ImageRecord>> {
        self.list_images(filter)
    }

    fn update_image(&self, id: &str, patch: &ImagePatch) -> Result<ImageRecord> {
        self.apply_image_patch(id, patch)
    }
}

impl TagStore for SqliteStateStore {
    fn fetch_tags(&self, filter: &TagFilter) -> Result<Vec<VocabularyTag>> {
        self.list_tags(filter)
    }

    fn update_tag(&self, id: &str, patch: &TagPatch) -> Result<VocabularyTag> {
        self.apply_tag_patch(id, patch)
    }

    fn insert_tag(&self, tag: &NewTag) -> Result<VocabularyTag> {
        self.create_tag(tag)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Unique-constraint failures become `Conflict`; everything else keeps its storage
/// classification.
fn map_write_error(err: rusqlite::Error, conflict: impl FnOnce() -> String) -> RefTagError {
    if is_constraint_violation(&err) {
        return RefTagError::Conflict(conflict());
    }
    RefTagError::from(err)
}

fn bool_to_i64(value: bool) -> i64 {
    i64::from(value)
}

fn u64_to_i64_saturating(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn i64_to_u64_clamped(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

#[cfg(unix)]
fn harden_sqlite_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    for suffix in ["", "-wal", "-shm"] {
        let mut os = path.as_os_str().to_os_string();
        os.push(suffix);
        let candidate = PathBuf::from(os);
        if candidate.exists() {
            std::fs::set_permissions(candidate, std::fs::Permissions::from_mode(0o600))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
