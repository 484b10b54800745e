use std::time::Instant;

use serde_json::json;

use crate::error::{RefTagError, Result};
use crate::models::{ImageFilter, SearchResponse};
use crate::search::{SearchOutcome, normalize_keywords, search};

use super::RefTag;

impl RefTag {
    /// Keyword search against the active vocabulary.
    ///
    /// A missing vocabulary or an empty query comes back as a response carrying an
    /// error code rather than `Err`; `Err` is reserved for storage failures.
    pub fn search_images<S: AsRef<str>>(&self, keywords: &[S]) -> Result<SearchResponse> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let normalized = normalize_keywords(keywords);
        let target = Some(normalized.join(" "));

        let outcome = match self.run_search(&normalized) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.log_request_error(
                    request_id,
                    "search",
                    started,
                    target,
                    &err,
                    Some(json!({ "keywords": normalized })),
                );
                return Err(err);
            }
        };

        let response = outcome.into_response(normalized);
        let details = json!({
            "keywords": response.keywords,
            "tier": response.tier,
            "candidates": response.candidates,
            "result_count": response.results.len(),
        });
        if let (Some(code), Some(message)) = (&response.error_code, &response.error) {
            let err = match code.as_str() {
                "CONFIGURATION_MISSING" => RefTagError::ConfigurationMissing,
                _ => RefTagError::Validation(message.clone()),
            };
            self.log_request_error(request_id, "search", started, target, &err, Some(details));
        } else if let Some(warning) = &response.warning {
            self.log_request_warning(
                request_id,
                "search",
                started,
                target,
                warning,
                Some(details),
            );
        } else {
            self.log_request_status(request_id, "search", started, target, Some(details));
        }
        Ok(response)
    }

    fn run_search(&self, keywords: &[String]) -> Result<SearchOutcome> {
        if keywords.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }
        let categories = match self.active_categories() {
            Ok(categories) => categories,
            Err(RefTagError::ConfigurationMissing) => {
                return Ok(SearchOutcome::ConfigurationMissing);
            }
            Err(err) => return Err(err),
        };
        let filter = ImageFilter {
            statuses: self.config.search.statuses.clone(),
        };
        let images = self.state.list_images(&filter)?;
        Ok(search(keywords, &images, &categories, &self.config.search.policy))
    }
}
