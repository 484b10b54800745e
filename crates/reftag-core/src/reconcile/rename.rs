use std::time::Instant;

use crate::error::{RefTagError, Result};
use crate::models::{Category, RenameReport, TagFilter, TagPatch, VocabularyTag};
use crate::store::{ImageCorpus, TagStore};
use crate::vocabulary::{find_category, normalize_tag_value};

use super::engine::reconcile_tag_value;

/// Renames `tag` to `new_value`, rewriting every referencing image first.
///
/// Renaming onto the value of another active tag in the category is a conflict; that
/// case is a merge.
pub fn rename_tag(
    corpus: &dyn ImageCorpus,
    tags: &dyn TagStore,
    categories: &[Category],
    tag: &VocabularyTag,
    new_value: &str,
    deadline: Option<Instant>,
) -> Result<RenameReport> {
    let category = find_category(categories, &tag.category)?;
    let new_value = normalize_tag_value(new_value)?;
    if !tag.is_active {
        return Err(RefTagError::Validation(format!(
            "cannot rename inactive tag: {}",
            tag.id
        )));
    }

    let mut report = RenameReport {
        category: category.key.clone(),
        tag_id: tag.id.clone(),
        previous_value: tag.tag_value.clone(),
        tag_value: new_value.clone(),
        images_scanned: 0,
        images_rewritten: 0,
        rewritten_image_ids: Vec::new(),
    };
    if new_value == tag.tag_value {
        return Ok(report);
    }

    let collision = tags
        .fetch_tags(&TagFilter::active_in(&tag.category))?
        .into_iter()
        .find(|other| other.id != tag.id && other.tag_value == new_value);
    if let Some(other) = collision {
        return Err(RefTagError::Conflict(format!(
            "tag value '{new_value}' already exists in category '{}' (tag {}); merge instead",
            tag.category, other.id
        )));
    }

    let stats = reconcile_tag_value(corpus, category, &tag.tag_value, &new_value, deadline)?;
    tags.update_tag(
        &tag.id,
        &TagPatch {
            tag_value: Some(new_value),
            ..TagPatch::default()
        },
    )?;

    report.images_scanned = stats.images_scanned;
    report.images_rewritten = stats.images_rewritten;
    report.rewritten_image_ids = stats.rewritten_image_ids;
    Ok(report)
}
