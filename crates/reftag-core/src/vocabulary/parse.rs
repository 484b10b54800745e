use std::path::Path;

use crate::error::{RefTagError, Result};
use crate::models::VocabularyConfigDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(RefTagError::Validation(format!(
                "unsupported vocabulary file extension: {} (expected .json or .toml)",
                path.display()
            ))),
        }
    }
}

pub fn parse_config_document(raw: &str) -> Result<VocabularyConfigDocument> {
    parse_with_format(raw, DocumentFormat::Json)
}

pub fn parse_config_file(path: &Path) -> Result<VocabularyConfigDocument> {
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    parse_with_format(&raw, format)
}

fn parse_with_format(raw: &str, format: DocumentFormat) -> Result<VocabularyConfigDocument> {
    match format {
        DocumentFormat::Json => serde_json::from_str::<VocabularyConfigDocument>(raw).map_err(
            |err| RefTagError::Validation(format!("vocabulary config parse failed: {err}")),
        ),
        DocumentFormat::Toml => toml::from_str::<VocabularyConfigDocument>(raw).map_err(|err| {
            RefTagError::Validation(format!("vocabulary config parse failed: {err}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::models::StorageKind;
    use crate::path::StoragePath;

    use super::*;

    #[test]
    fn json_document_missing_storage_path_is_a_configuration_error() {
        let raw = r#"{"categories": [{"key": "style", "storage_type": "array"}]}"#;
        let err = parse_config_document(raw).expect_err("storage_path is required");
        assert!(matches!(err, RefTagError::Validation(_)));
    }

    #[test]
    fn toml_document_parses_categories() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("taxonomy.toml");
        std::fs::write(
            &path,
            r#"
name = "studio"

[[categories]]
key = "style"
label = "Style"
storage_path = "tags.style"
storage_type = "jsonb_array"
search_weight = 3

[[categories]]
key = "industry"
storage_path = "industries"
storage_type = "array"
"#,
        )
        .expect("write toml");

        let document = parse_config_file(&path).expect("parse toml");
        assert_eq!(document.name.as_deref(), Some("studio"));
        assert_eq!(document.categories.len(), 2);
        assert_eq!(
            document.categories[0].storage_path,
            StoragePath::Nested("tags".to_string(), "style".to_string())
        );
        assert_eq!(document.categories[0].storage_type, StorageKind::JsonbArray);
        assert_eq!(document.categories[1].search_weight, 1);
        assert_eq!(document.categories[1].label, "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = parse_config_file(Path::new("taxonomy.yaml")).expect_err("yaml unsupported");
        assert!(matches!(err, RefTagError::Validation(_)));
    }
}
