use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RefTagError, Result};
use crate::path::RecordFields;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    #[default]
    Pending,
    Tagged,
    Approved,
    Skipped,
}

impl ImageStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Tagged => "tagged",
            Self::Approved => "approved",
            Self::Skipped => "skipped",
        }
    }
}

impl Display for ImageStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStatus {
    type Err = RefTagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "tagged" => Ok(Self::Tagged),
            "approved" => Ok(Self::Approved),
            "skipped" => Ok(Self::Skipped),
            other => Err(RefTagError::Validation(format!(
                "invalid image status: {other} (expected pending|tagged|approved|skipped)"
            ))),
        }
    }
}

/// One uploaded reference image. Category values live in `fields`, addressed by
/// each category's storage path; media references are carried but never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: String,
    pub status: ImageStatus,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub fields: RecordFields,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct NewImage {
    #[serde(default)]
    pub id: Option<String>,
    pub file_name: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub status: Option<ImageStatus>,
    #[serde(default)]
    pub fields: RecordFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFilter {
    pub statuses: Option<Vec<ImageStatus>>,
}

impl ImageFilter {
    #[must_use]
    pub const fn all() -> Self {
        Self { statuses: None }
    }

    #[must_use]
    pub fn with_statuses(statuses: &[ImageStatus]) -> Self {
        Self {
            statuses: Some(statuses.to_vec()),
        }
    }
}

/// Partial image update: top-level fields present in `fields` replace the stored
/// ones, everything else is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImagePatch {
    pub fields: RecordFields,
    pub status: Option<ImageStatus>,
}

impl ImagePatch {
    #[must_use]
    pub fn fields(fields: RecordFields) -> Self {
        Self {
            fields,
            status: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.status.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagImageResult {
    pub image: ImageRecord,
    pub category: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub created_tags: Vec<String>,
}
