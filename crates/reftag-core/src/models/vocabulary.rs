use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RefTagError, Result};
use crate::path::StoragePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    Array,
    JsonbArray,
    Text,
}

impl StorageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::JsonbArray => "jsonb_array",
            Self::Text => "text",
        }
    }

    /// `array` and `jsonb_array` share list semantics in every engine.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Array | Self::JsonbArray)
    }
}

impl Display for StorageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = RefTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "jsonb_array" => Ok(Self::JsonbArray),
            "text" => Ok(Self::Text),
            other => Err(RefTagError::Validation(format!(
                "invalid storage_type: {other} (expected array|jsonb_array|text)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub storage_path: StoragePath,
    pub storage_type: StorageKind,
    #[serde(default = "default_search_weight")]
    pub search_weight: u32,
}

impl Category {
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        storage_path: StoragePath,
        storage_type: StorageKind,
        search_weight: u32,
    ) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            description: None,
            placeholder: None,
            storage_path,
            storage_type,
            search_weight,
        }
    }
}

/// Taxonomy as authored by an administrator, before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct VocabularyConfigDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyConfig {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyConfigSummary {
    pub id: String,
    pub name: String,
    pub category_count: usize,
    pub is_active: bool,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VocabularyTag {
    pub id: String,
    pub category: String,
    pub tag_value: String,
    pub is_active: bool,
    pub times_used: u64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl TagFilter {
    #[must_use]
    pub fn active_in(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            is_active: Some(true),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub tag_value: Option<String>,
    pub is_active: Option<bool>,
    pub times_used: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub category: String,
    pub tag_value: String,
    pub times_used: u64,
}

const fn default_search_weight() -> u32 {
    1
}
