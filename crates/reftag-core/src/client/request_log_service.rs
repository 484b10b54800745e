use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;

use crate::error::{RefTagError, Result};
use crate::models::{RequestLogEntry, RequestLogPage};

use super::RefTag;

impl RefTag {
    pub(super) fn try_log_request(&self, entry: &RequestLogEntry) {
        if !self.config.request_log_enabled {
            return;
        }
        let path = self.request_log_path();
        if let Some(parent) = path.parent()
            && fs::create_dir_all(parent).is_err()
        {
            return;
        }
        if let Ok(serialized) = serde_json::to_string(entry)
            && let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path)
        {
            let mut line = serialized;
            line.push('\n');
            let _ = file.write_all(line.as_bytes());
        }
    }

    pub(super) fn log_request_status(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        target: Option<String>,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "ok".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            target,
            error_code: None,
            error_message: None,
            details,
        });
    }

    pub(super) fn log_request_error(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        target: Option<String>,
        err: &RefTagError,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "error".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            target,
            error_code: Some(err.code().to_string()),
            error_message: Some(err.to_string()),
            details,
        });
    }

    pub(super) fn log_request_warning(
        &self,
        request_id: String,
        operation: &str,
        started: Instant,
        target: Option<String>,
        warning_message: &str,
        details: Option<serde_json::Value>,
    ) {
        self.try_log_request(&RequestLogEntry {
            request_id,
            operation: operation.to_string(),
            status: "warning".to_string(),
            latency_ms: started.elapsed().as_millis(),
            created_at: Utc::now().to_rfc3339(),
            target,
            error_code: None,
            error_message: Some(warning_message.to_string()),
            details,
        });
    }

    /// Runs `op` and records one request log line for it, ok or error.
    pub(super) fn logged<T>(
        &self,
        operation: &str,
        target: Option<String>,
        details: serde_json::Value,
        op: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        match op() {
            Ok(value) => {
                self.log_request_status(request_id, operation, started, target, Some(details));
                Ok(value)
            }
            Err(err) => {
                self.log_request_error(
                    request_id,
                    operation,
                    started,
                    target,
                    &err,
                    Some(details),
                );
                Err(err)
            }
        }
    }

    /// Most recent request log entries, newest first. Malformed lines are skipped;
    /// a log with no readable line at all is an error.
    pub fn recent_request_logs(&self, limit: usize) -> Result<RequestLogPage> {
        let path = self.request_log_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        let mut page = parse_request_log(&raw, &path)?;
        page.entries.reverse();
        page.entries.truncate(limit);
        Ok(page)
    }
}

/// Parses request log lines in file order. Blank lines are ignored and lines that are
/// not a `RequestLogEntry` are counted in `skipped_lines`.
fn parse_request_log(raw: &str, path: &Path) -> Result<RequestLogPage> {
    let mut entries = Vec::new();
    let mut skipped_lines = 0usize;
    let mut first_error = None::<(usize, String)>;

    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<RequestLogEntry>(line) {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                skipped_lines += 1;
                first_error.get_or_insert_with(|| (index + 1, err.to_string()));
            }
        }
    }

    if entries.is_empty()
        && let Some((line_no, message)) = first_error
    {
        return Err(RefTagError::Validation(format!(
            "request log {} is unreadable: {skipped_lines} invalid lines (line {line_no}: \
             {message})",
            path.display()
        )));
    }
    Ok(RequestLogPage {
        entries,
        skipped_lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG_PATH: &str = "logs/requests.jsonl";

    fn line(operation: &str) -> String {
        format!(
            r#"{{"request_id":"r-{operation}","operation":"{operation}","status":"ok","latency_ms":3,"created_at":"2026-01-01T00:00:00Z"}}"#
        )
    }

    #[test]
    fn parse_keeps_file_order_and_counts_malformed_lines() {
        let raw = format!(
            "{}\n\nnot json\n{}\n{{\"operation\":1}}\n",
            line("search"),
            line("tag.add")
        );
        let page = parse_request_log(&raw, Path::new(LOG_PATH)).expect("page");
        let operations = page
            .entries
            .iter()
            .map(|entry| entry.operation.as_str())
            .collect::<Vec<_>>();
        assert_eq!(operations, vec!["search", "tag.add"]);
        assert_eq!(page.skipped_lines, 2);
    }

    #[test]
    fn parse_fails_when_no_line_is_readable() {
        let err = parse_request_log("oops\n{}\n", Path::new(LOG_PATH)).expect_err("unreadable");
        let message = err.to_string();
        assert!(message.contains(LOG_PATH));
        assert!(message.contains("2 invalid lines (line 1:"));

        let empty = parse_request_log("\n", Path::new(LOG_PATH)).expect("empty");
        assert!(empty.entries.is_empty());
        assert_eq!(empty.skipped_lines, 0);
    }
}
