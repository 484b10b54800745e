use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::image::ImageStatus;

/// Threshold pass that produced a search result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTier {
    Primary,
    Fallback,
    AnyMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredImage {
    pub id: String,
    pub status: ImageStatus,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub score: u32,
    pub matched_keywords: Vec<String>,
    pub matched_on: BTreeMap<String, Vec<String>>,
    /// Current value of every configured category, keyed by category key.
    /// Unresolved paths appear as `null`.
    pub categories: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResponse {
    pub keywords: Vec<String>,
    pub results: Vec<ScoredImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<SearchTier>,
    pub candidates: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl SearchResponse {
    #[must_use]
    pub fn failed(keywords: Vec<String>, code: &str, message: impl Into<String>) -> Self {
        Self {
            keywords,
            error: Some(message.into()),
            error_code: Some(code.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
