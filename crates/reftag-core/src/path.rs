//! Storage-path addressing for image records.
//!
//! A category stores its value at a location described as data: either a top-level
//! field (`industries`) or one level of nesting (`tags.style`). Reads never fail on a
//! missing intermediate object; nested writes keep sibling keys intact.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RefTagError, Result};

pub type RecordFields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StoragePath {
    Direct(String),
    Nested(String, String),
}

impl StoragePath {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RefTagError::Validation(
                "storage path must not be empty".to_string(),
            ));
        }

        let segments = trimmed.split('.').collect::<Vec<_>>();
        if segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(RefTagError::Validation(format!(
                "storage path has an empty segment: {trimmed}"
            )));
        }
        match segments.as_slice() {
            [field] => Ok(Self::Direct((*field).to_string())),
            [outer, inner] => Ok(Self::Nested((*outer).to_string(), (*inner).to_string())),
            _ => Err(RefTagError::Validation(format!(
                "storage path supports at most two segments: {trimmed}"
            ))),
        }
    }

    /// Top-level field touched by this path; the unit of a partial image update.
    #[must_use]
    pub fn root_field(&self) -> &str {
        match self {
            Self::Direct(field) | Self::Nested(field, _) => field,
        }
    }

    #[must_use]
    pub fn read<'a>(&self, record: &'a RecordFields) -> Option<&'a Value> {
        match self {
            Self::Direct(field) => record.get(field),
            Self::Nested(outer, inner) => record.get(outer)?.as_object()?.get(inner),
        }
    }

    /// Writes `value` at this path. For nested paths the existing object under the
    /// outer field is shallow-merged and a missing or null outer value becomes a fresh
    /// object. An outer value of any other shape is left alone and the write fails.
    pub fn write(&self, record: &mut RecordFields, value: Value) -> Result<()> {
        match self {
            Self::Direct(field) => {
                record.insert(field.clone(), value);
            }
            Self::Nested(outer, inner) => {
                let mut nested = match record.get(outer) {
                    None | Some(Value::Null) => RecordFields::new(),
                    Some(Value::Object(existing)) => existing.clone(),
                    Some(_) => {
                        return Err(RefTagError::Validation(format!(
                            "cannot write {self}: field '{outer}' holds a non-object value"
                        )));
                    }
                };
                nested.insert(inner.clone(), value);
                record.insert(outer.clone(), Value::Object(nested));
            }
        }
        Ok(())
    }

    /// Copy-on-write variant of [`StoragePath::write`].
    pub fn with_value(&self, record: &RecordFields, value: Value) -> Result<RecordFields> {
        let mut updated = record.clone();
        self.write(&mut updated, value)?;
        Ok(updated)
    }

    /// Partial field set that persists a write at this path: just the root field with
    /// its post-write value.
    #[must_use]
    pub fn root_patch(&self, record: &RecordFields) -> RecordFields {
        let mut patch = RecordFields::new();
        if let Some(value) = record.get(self.root_field()) {
            patch.insert(self.root_field().to_string(), value.clone());
        }
        patch
    }
}

impl Display for StoragePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(field) => f.write_str(field),
            Self::Nested(outer, inner) => write!(f, "{outer}.{inner}"),
        }
    }
}

impl FromStr for StoragePath {
    type Err = RefTagError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StoragePath {
    type Error = RefTagError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StoragePath> for String {
    fn from(value: StoragePath) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> RecordFields {
        value.as_object().cloned().expect("object fixture")
    }

    #[test]
    fn parse_accepts_one_and_two_segments() {
        assert_eq!(
            StoragePath::parse("industries").expect("direct"),
            StoragePath::Direct("industries".to_string())
        );
        assert_eq!(
            StoragePath::parse(" tags.style ").expect("nested"),
            StoragePath::Nested("tags".to_string(), "style".to_string())
        );
    }

    #[test]
    fn parse_rejects_deep_and_empty_paths() {
        assert!(StoragePath::parse("a.b.c").is_err());
        assert!(StoragePath::parse("").is_err());
        assert!(StoragePath::parse("tags.").is_err());
        assert!(StoragePath::parse(".style").is_err());
    }

    #[test]
    fn read_tolerates_missing_intermediate_objects() {
        let record = fields(json!({"industries": ["retail"], "tags": "not-an-object"}));
        let nested = StoragePath::parse("tags.style").expect("path");
        assert_eq!(nested.read(&record), None);

        let absent = StoragePath::parse("meta.mood").expect("path");
        assert_eq!(absent.read(&record), None);

        let direct = StoragePath::parse("industries").expect("path");
        assert_eq!(direct.read(&record), Some(&json!(["retail"])));
    }

    #[test]
    fn nested_write_preserves_sibling_keys() {
        let mut record = fields(json!({"tags": {"style": ["modern"], "mood": ["calm"]}}));
        let path = StoragePath::parse("tags.style").expect("path");
        path.write(&mut record, json!(["retro"])).expect("write");

        assert_eq!(record["tags"]["style"], json!(["retro"]));
        assert_eq!(record["tags"]["mood"], json!(["calm"]));
    }

    #[test]
    fn write_then_read_round_trips_including_absent_nesting() {
        let record = RecordFields::new();
        for raw in ["industries", "tags.style"] {
            let path = StoragePath::parse(raw).expect("path");
            let updated = path
                .with_value(&record, json!("brutalist"))
                .expect("write");
            assert_eq!(path.read(&updated), Some(&json!("brutalist")));
        }
    }

    #[test]
    fn root_patch_carries_only_the_touched_field() {
        let mut record = fields(json!({"tags": {"mood": ["calm"]}, "industries": ["retail"]}));
        let path = StoragePath::parse("tags.style").expect("path");
        path.write(&mut record, json!(["retro"])).expect("write");

        let patch = path.root_patch(&record);
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["tags"], json!({"mood": ["calm"], "style": ["retro"]}));
    }

    #[test]
    fn nested_write_refuses_to_replace_non_object_outer_value() {
        let mut record = fields(json!({"tags": ["retail"], "meta": null}));
        let path = StoragePath::parse("tags.style").expect("path");
        let err = path
            .write(&mut record, json!(["retro"]))
            .expect_err("outer array must be kept");
        assert!(matches!(err, RefTagError::Validation(_)));
        assert_eq!(record["tags"], json!(["retail"]));

        let null_outer = StoragePath::parse("meta.mood").expect("path");
        null_outer
            .write(&mut record, json!("calm"))
            .expect("null outer is replaced");
        assert_eq!(record["meta"], json!({"mood": "calm"}));
    }

    #[test]
    fn serde_uses_dotted_string_form() {
        let path: StoragePath = serde_json::from_value(json!("tags.style")).expect("decode");
        assert_eq!(serde_json::to_value(&path).expect("encode"), json!("tags.style"));
        assert!(serde_json::from_value::<StoragePath>(json!("a.b.c")).is_err());
    }
}
