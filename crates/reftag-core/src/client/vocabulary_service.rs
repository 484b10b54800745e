use std::path::Path;

use serde_json::json;

use crate::error::{RefTagError, Result};
use crate::models::{VocabularyConfig, VocabularyConfigDocument, VocabularyConfigSummary};
use crate::vocabulary::{parse_config_file, validate_config_document};

use super::RefTag;

const DEFAULT_CONFIG_NAME: &str = "default";

impl RefTag {
    pub fn import_vocabulary_config(
        &self,
        document: &VocabularyConfigDocument,
        activate: bool,
    ) -> Result<VocabularyConfig> {
        let name = document
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CONFIG_NAME)
            .to_string();
        self.logged(
            "vocab.import",
            Some(name.clone()),
            json!({ "categories": document.categories.len(), "activate": activate }),
            || {
                validate_config_document(document)?;
                self.state
                    .insert_vocabulary_config(&name, &document.categories, activate)
            },
        )
    }

    /// Imports a `.json` or `.toml` category document from disk.
    pub fn import_vocabulary_file(&self, path: &Path, activate: bool) -> Result<VocabularyConfig> {
        let document = parse_config_file(path)?;
        self.import_vocabulary_config(&document, activate)
    }

    pub fn activate_vocabulary_config(&self, id: &str) -> Result<VocabularyConfig> {
        self.logged("vocab.activate", Some(id.to_string()), json!({}), || {
            self.state.activate_vocabulary_config(id)
        })
    }

    pub fn active_vocabulary_config(&self) -> Result<VocabularyConfig> {
        self.state
            .active_vocabulary_config()?
            .ok_or(RefTagError::ConfigurationMissing)
    }

    pub fn get_vocabulary_config(&self, id: &str) -> Result<VocabularyConfig> {
        self.state
            .get_vocabulary_config(id)?
            .ok_or_else(|| RefTagError::NotFound(format!("vocabulary config {id}")))
    }

    pub fn list_vocabulary_configs(&self) -> Result<Vec<VocabularyConfigSummary>> {
        self.state.list_vocabulary_configs()
    }
}
