use crate::error::{RefTagError, Result};
use crate::models::ImageStatus;
use crate::search::SearchPolicy;

use super::env::{read_env_u32, read_env_usize, read_raw_env};

const ENV_PRIMARY_THRESHOLD: &str = "REFTAG_SEARCH_PRIMARY_THRESHOLD";
const ENV_FALLBACK_THRESHOLD: &str = "REFTAG_SEARCH_FALLBACK_THRESHOLD";
const ENV_MIN_PRIMARY_RESULTS: &str = "REFTAG_SEARCH_MIN_PRIMARY_RESULTS";
const ENV_RESULT_LIMIT: &str = "REFTAG_SEARCH_RESULT_LIMIT";
const ENV_SEARCH_STATUSES: &str = "REFTAG_SEARCH_STATUSES";

const DEFAULT_SEARCH_STATUSES: [ImageStatus; 2] = [ImageStatus::Tagged, ImageStatus::Approved];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub policy: SearchPolicy,
    /// `None` searches every image regardless of status.
    pub statuses: Option<Vec<ImageStatus>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: SearchPolicy::default(),
            statuses: Some(DEFAULT_SEARCH_STATUSES.to_vec()),
        }
    }
}

impl SearchConfig {
    pub(super) fn from_env() -> Result<Self> {
        let defaults = SearchPolicy::default();
        Ok(Self {
            policy: SearchPolicy {
                primary_threshold: read_env_u32(
                    ENV_PRIMARY_THRESHOLD,
                    defaults.primary_threshold,
                    1,
                ),
                fallback_threshold: read_env_u32(
                    ENV_FALLBACK_THRESHOLD,
                    defaults.fallback_threshold,
                    1,
                ),
                min_primary_results: read_env_usize(
                    ENV_MIN_PRIMARY_RESULTS,
                    defaults.min_primary_results,
                    0,
                ),
                result_limit: read_env_usize(ENV_RESULT_LIMIT, defaults.result_limit, 1),
            },
            statuses: parse_statuses(read_raw_env(ENV_SEARCH_STATUSES).as_deref())?,
        })
    }
}

fn parse_statuses(raw: Option<&str>) -> Result<Option<Vec<ImageStatus>>> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(Some(DEFAULT_SEARCH_STATUSES.to_vec()));
    };
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    let mut statuses = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let status = part.parse::<ImageStatus>().map_err(|err| {
            RefTagError::Validation(format!("invalid {ENV_SEARCH_STATUSES}: {err}"))
        })?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(Some(statuses))
}
