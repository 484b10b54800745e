use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, RefTagError>;

#[derive(Debug, Error)]
pub enum RefTagError {
    #[error("no active vocabulary configuration")]
    ConfigurationMissing,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(
        "partial merge of tag '{source_tag}': {rewritten} image(s) rewritten before failure at {}: {reason}",
        .failed_image_id.as_deref().unwrap_or("<deadline>")
    )]
    PartialMerge {
        source_tag: String,
        rewritten: usize,
        failed_image_id: Option<String>,
        reason: String,
    },

    #[error("storage temporarily unavailable: {0}")]
    StorageTransient(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for RefTagError {
    fn from(err: rusqlite::Error) -> Self {
        if is_transient_sqlite_error(&err) {
            return Self::StorageTransient(err.to_string());
        }
        Self::Sqlite(err)
    }
}

fn is_transient_sqlite_error(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if matches!(
                inner.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            )
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl RefTagError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "CONFIGURATION_MISSING",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::PartialMerge { .. } => "PARTIAL_MERGE",
            Self::StorageTransient(_) => "STORAGE_TRANSIENT",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageTransient(_))
    }

    pub(crate) fn mutex_poisoned(name: &str) -> Self {
        Self::Internal(format!("{name} mutex poisoned"))
    }

    pub fn to_payload(&self, operation: impl Into<String>, target: Option<String>) -> ErrorPayload {
        let details = match self {
            Self::PartialMerge {
                source_tag,
                rewritten,
                failed_image_id,
                reason,
            } => Some(serde_json::json!({
                "source_tag": source_tag,
                "rewritten": rewritten,
                "failed_image_id": failed_image_id,
                "reason": reason,
            })),
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            retryable: self.is_retryable(),
            target,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_sqlite_failures_are_classified_as_transient() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            Some("database is locked".to_string()),
        );
        let err = RefTagError::from(busy);
        assert!(matches!(err, RefTagError::StorageTransient(_)));
        assert!(err.is_retryable());

        let other = RefTagError::from(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(other.code(), "SQLITE_ERROR");
        assert!(!other.is_retryable());
    }

    #[test]
    fn partial_merge_payload_carries_progress_details() {
        let err = RefTagError::PartialMerge {
            source_tag: "mid-century".to_string(),
            rewritten: 2,
            failed_image_id: Some("img-3".to_string()),
            reason: "disk full".to_string(),
        };
        let payload = err.to_payload("tag.merge", None);
        assert_eq!(payload.code, "PARTIAL_MERGE");
        let details = payload.details.expect("details");
        assert_eq!(details["rewritten"], 2);
        assert_eq!(details["failed_image_id"], "img-3");
        assert!(payload.message.contains("img-3"));
    }
}
