mod image;
mod reconcile;
mod search;
mod trace;
mod vocabulary;

pub use image::{ImageFilter, ImagePatch, ImageRecord, ImageStatus, NewImage, TagImageResult};
pub use reconcile::{MergeReport, ReconcileStats, RenameReport, UsageRecount};
pub use search::{ScoredImage, SearchResponse, SearchTier};
pub use trace::{RequestLogEntry, RequestLogPage};
pub use vocabulary::{
    Category, NewTag, StorageKind, TagFilter, TagPatch, VocabularyConfig,
    VocabularyConfigDocument, VocabularyConfigSummary, VocabularyTag,
};
