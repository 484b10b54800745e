// Public fallible APIs in this crate share one concrete error contract (`RefTagError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod path;
pub mod reconcile;
pub mod search;
pub mod state;
pub mod store;
pub mod vocabulary;

pub use client::RefTag;
pub use config::AppConfig;
pub use error::{RefTagError, Result};
pub use path::StoragePath;
