//! Tag reconciliation: rewriting every image that references a retired or renamed tag
//! value, then updating the tag rows.
//!
//! Writes are per image and not transactional. The first failed write aborts the pass;
//! images already rewritten stay rewritten and the failure is reported as
//! [`RefTagError::PartialMerge`](crate::error::RefTagError::PartialMerge).

mod engine;
mod merge;
mod rename;
mod usage;

pub use engine::{reconcile_tag_value, rewrite_value};
pub use merge::merge_tags;
pub use rename::rename_tag;
pub use usage::{count_references, recount_usage};
