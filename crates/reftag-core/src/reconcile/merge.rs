use std::time::Instant;

use crate::error::{RefTagError, Result};
use crate::models::{Category, MergeReport, TagPatch, VocabularyTag};
use crate::store::{ImageCorpus, TagStore};
use crate::vocabulary::find_category;

use super::engine::reconcile_tag_value;

/// Folds `source` into `target`: every image holding the source value ends up holding
/// the target value instead, then the source tag is deactivated and the target's usage
/// count is set from the corpus.
///
/// The source is deactivated only after every image write succeeded, so an aborted
/// merge leaves the source visible for a re-run. Re-running after success rewrites
/// nothing.
pub fn merge_tags(
    corpus: &dyn ImageCorpus,
    tags: &dyn TagStore,
    categories: &[Category],
    source: &VocabularyTag,
    target: &VocabularyTag,
    deadline: Option<Instant>,
) -> Result<MergeReport> {
    let category = find_category(categories, &source.category)?;
    if source.category != target.category {
        return Err(RefTagError::Validation(format!(
            "merge requires tags of one category: source={} target={}",
            source.category, target.category
        )));
    }
    if source.id == target.id {
        return Err(RefTagError::Validation(format!(
            "cannot merge tag into itself: {}",
            source.id
        )));
    }

    let stats = reconcile_tag_value(
        corpus,
        category,
        &source.tag_value,
        &target.tag_value,
        deadline,
    )?;

    tags.update_tag(
        &source.id,
        &TagPatch {
            is_active: Some(false),
            ..TagPatch::default()
        },
    )?;
    let target_times_used = u64::try_from(stats.replacement_references).unwrap_or(u64::MAX);
    tags.update_tag(
        &target.id,
        &TagPatch {
            times_used: Some(target_times_used),
            ..TagPatch::default()
        },
    )?;

    Ok(MergeReport {
        category: category.key.clone(),
        source_tag_id: source.id.clone(),
        source_value: source.tag_value.clone(),
        target_tag_id: target.id.clone(),
        target_value: target.tag_value.clone(),
        images_scanned: stats.images_scanned,
        images_rewritten: stats.images_rewritten,
        rewritten_image_ids: stats.rewritten_image_ids,
        target_times_used,
    })
}
