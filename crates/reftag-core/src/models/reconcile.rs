use serde::{Deserialize, Serialize};

/// Outcome of rewriting every image that references one tag value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileStats {
    pub images_scanned: usize,
    pub images_rewritten: usize,
    pub rewritten_image_ids: Vec<String>,
    /// Images holding the replacement value once the pass completes.
    pub replacement_references: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeReport {
    pub category: String,
    pub source_tag_id: String,
    pub source_value: String,
    pub target_tag_id: String,
    pub target_value: String,
    pub images_scanned: usize,
    pub images_rewritten: usize,
    pub rewritten_image_ids: Vec<String>,
    pub target_times_used: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameReport {
    pub category: String,
    pub tag_id: String,
    pub previous_value: String,
    pub tag_value: String,
    pub images_scanned: usize,
    pub images_rewritten: usize,
    pub rewritten_image_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageRecount {
    pub tag_id: String,
    pub tag_value: String,
    pub previous: u64,
    pub times_used: u64,
}
