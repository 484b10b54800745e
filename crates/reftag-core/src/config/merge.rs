use std::time::Duration;

use super::env::read_env_u64;

const ENV_MERGE_TIMEOUT_MS: &str = "REFTAG_MERGE_TIMEOUT_MS";
const DEFAULT_MERGE_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeConfig {
    /// Overall deadline for one merge or rename pass; `None` disables it.
    pub timeout: Option<Duration>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_millis(DEFAULT_MERGE_TIMEOUT_MS)),
        }
    }
}

impl MergeConfig {
    #[must_use]
    pub(super) fn from_env() -> Self {
        Self::from_timeout_ms(read_env_u64(ENV_MERGE_TIMEOUT_MS))
    }

    fn from_timeout_ms(raw: Option<u64>) -> Self {
        match raw {
            None => Self::default(),
            Some(0) => Self { timeout: None },
            Some(ms) => Self {
                timeout: Some(Duration::from_millis(ms)),
            },
        }
    }
}
