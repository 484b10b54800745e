//! Collaborator seams for the engines. The SQLite state store implements all three;
//! anything else (a remote corpus, a test double) can stand in.

use crate::error::Result;
use crate::models::{
    ImageFilter, ImagePatch, ImageRecord, NewTag, TagFilter, TagPatch, VocabularyConfig,
    VocabularyTag,
};

pub trait VocabularyStore: Send + Sync {
    /// `Ok(None)` when no configuration exists or none is active.
    fn fetch_active_vocabulary_config(&self) -> Result<Option<VocabularyConfig>>;
}

pub trait ImageCorpus: Send + Sync {
    fn fetch_images(&self, filter: &ImageFilter) -> Result<Vec<ImageRecord>>;

    fn update_image(&self, id: &str, patch: &ImagePatch) -> Result<ImageRecord>;
}

pub trait TagStore: Send + Sync {
    fn fetch_tags(&self, filter: &TagFilter) -> Result<Vec<VocabularyTag>>;

    fn update_tag(&self, id: &str, patch: &TagPatch) -> Result<VocabularyTag>;

    fn insert_tag(&self, tag: &NewTag) -> Result<VocabularyTag>;
}
