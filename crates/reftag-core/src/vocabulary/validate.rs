use std::collections::HashSet;

use crate::error::{RefTagError, Result};
use crate::models::VocabularyConfigDocument;
use crate::path::StoragePath;

/// Top-level image fields owned by the record itself; no category may store there.
pub const RESERVED_RECORD_FIELDS: [&str; 5] =
    ["id", "status", "file_name", "file_url", "thumbnail_url"];

pub fn validate_config_document(document: &VocabularyConfigDocument) -> Result<()> {
    if document.categories.is_empty() {
        return Err(RefTagError::Validation(
            "vocabulary config must declare at least one category".to_string(),
        ));
    }

    let mut keys = HashSet::<&str>::new();
    let mut paths = HashSet::<String>::new();
    for (index, category) in document.categories.iter().enumerate() {
        let key = category.key.trim();
        if key.is_empty() {
            return Err(RefTagError::Validation(format!(
                "category key must not be empty: index={index}"
            )));
        }
        if key != category.key {
            return Err(RefTagError::Validation(format!(
                "category key must not carry surrounding whitespace: '{}'",
                category.key
            )));
        }
        if !keys.insert(key) {
            return Err(RefTagError::Validation(format!(
                "duplicate category key: {key}"
            )));
        }
        if category.search_weight == 0 {
            return Err(RefTagError::Validation(format!(
                "search_weight must be >= 1: category={key}"
            )));
        }

        let root = category.storage_path.root_field();
        if RESERVED_RECORD_FIELDS.contains(&root) {
            return Err(RefTagError::Validation(format!(
                "storage_path shadows a reserved image field: category={key} path={}",
                category.storage_path
            )));
        }
        if !paths.insert(category.storage_path.to_string()) {
            return Err(RefTagError::Validation(format!(
                "storage_path is shared by more than one category: {}",
                category.storage_path
            )));
        }
    }

    for direct in &document.categories {
        let StoragePath::Direct(field) = &direct.storage_path else {
            continue;
        };
        if let Some(nested) = document.categories.iter().find(|other| {
            matches!(&other.storage_path, StoragePath::Nested(outer, _) if outer == field)
        }) {
            return Err(RefTagError::Validation(format!(
                "storage_path '{field}' (category {}) is the parent of '{}' (category {})",
                direct.key, nested.storage_path, nested.key
            )));
        }
    }
    Ok(())
}

/// Canonical form of a stored value: trimmed, lowercased, inner whitespace collapsed.
/// Blank input yields an empty string.
#[must_use]
pub fn canonical_tag_value(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical form of a new tag value; blank input is rejected.
pub fn normalize_tag_value(raw: &str) -> Result<String> {
    let normalized = canonical_tag_value(raw);
    if normalized.is_empty() {
        return Err(RefTagError::Validation(
            "tag value must not be empty".to_string(),
        ));
    }
    Ok(normalized)
}
