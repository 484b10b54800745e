use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::Category;
use crate::state::SqliteStateStore;
use crate::vocabulary::get_active_categories;

mod image_service;
mod request_log_service;
mod search_service;
mod tag_service;
mod vocabulary_service;

const STATE_DB_FILE: &str = ".reftag_state.sqlite3";
const REQUEST_LOG_RELATIVE_PATH: &str = "logs/requests.jsonl";

/// Service facade over one tagging workspace: a root directory holding the state
/// database and the request log.
#[derive(Clone)]
pub struct RefTag {
    pub state: SqliteStateStore,
    root: PathBuf,
    config: AppConfig,
}

impl std::fmt::Debug for RefTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefTag")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl RefTag {
    pub fn new(root_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(root_dir, AppConfig::from_env()?)
    }

    pub fn with_config(root_dir: impl Into<PathBuf>, config: AppConfig) -> Result<Self> {
        let root = root_dir.into();
        fs::create_dir_all(&root)?;
        let state = SqliteStateStore::open(root.join(STATE_DB_FILE))?;
        Ok(Self {
            state,
            root,
            config,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn request_log_path(&self) -> PathBuf {
        self.root.join(REQUEST_LOG_RELATIVE_PATH)
    }

    /// Categories of the active vocabulary, fetched fresh for each operation.
    pub fn active_categories(&self) -> Result<Vec<Category>> {
        get_active_categories(&self.state)
    }

    fn merge_deadline(&self) -> Option<Instant> {
        self.config
            .merge
            .timeout
            .and_then(|timeout| Instant::now().checked_add(timeout))
    }
}
