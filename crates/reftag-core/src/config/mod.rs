use crate::error::Result;

mod env;
mod merge;
mod search;

pub use merge::MergeConfig;
pub use search::SearchConfig;

const ENV_REQUEST_LOG: &str = "REFTAG_REQUEST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub merge: MergeConfig,
    pub request_log_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            merge: MergeConfig::default(),
            request_log_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            search: SearchConfig::from_env()?,
            merge: MergeConfig::from_env(),
            request_log_enabled: env::parse_enabled_default_true(
                env::read_raw_env(ENV_REQUEST_LOG).as_deref(),
            ),
        })
    }
}
