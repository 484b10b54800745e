use serde_json::json;

use crate::error::{RefTagError, Result};
use crate::models::{MergeReport, NewTag, RenameReport, TagFilter, UsageRecount, VocabularyTag};
use crate::reconcile::{count_references, merge_tags, recount_usage, rename_tag};
use crate::vocabulary::{find_category, normalize_tag_value};

use super::RefTag;

impl RefTag {
    /// Registers a new active tag. Its usage count starts from the images that already
    /// hold the value.
    pub fn add_tag(&self, category_key: &str, value: &str) -> Result<VocabularyTag> {
        self.logged(
            "tag.add",
            Some(format!("{category_key}:{value}")),
            json!({ "category": category_key }),
            || {
                let categories = self.active_categories()?;
                let category = find_category(&categories, category_key)?;
                let tag_value = normalize_tag_value(value)?;
                if self
                    .state
                    .find_active_tag(&category.key, &tag_value)?
                    .is_some()
                {
                    return Err(RefTagError::Conflict(format!(
                        "active tag already exists: {}:{tag_value}",
                        category.key
                    )));
                }
                let times_used = count_references(&self.state, category)?
                    .get(&tag_value)
                    .copied()
                    .unwrap_or(0);
                self.state.create_tag(&NewTag {
                    category: category.key.clone(),
                    tag_value,
                    times_used,
                })
            },
        )
    }

    pub fn get_tag(&self, tag_id: &str) -> Result<VocabularyTag> {
        self.state
            .get_tag(tag_id)?
            .ok_or_else(|| RefTagError::NotFound(format!("tag {tag_id}")))
    }

    pub fn list_tags(&self, filter: &TagFilter) -> Result<Vec<VocabularyTag>> {
        self.state.list_tags(filter)
    }

    pub fn rename_tag(&self, tag_id: &str, new_value: &str) -> Result<RenameReport> {
        self.logged(
            "tag.rename",
            Some(tag_id.to_string()),
            json!({ "tag_value": new_value }),
            || {
                let tag = self.get_tag(tag_id)?;
                let categories = self.active_categories()?;
                rename_tag(
                    &self.state,
                    &self.state,
                    &categories,
                    &tag,
                    new_value,
                    self.merge_deadline(),
                )
            },
        )
    }

    /// Merges the source tag into the target tag across the whole corpus.
    ///
    /// Both tags must be active and belong to one category of the active vocabulary.
    /// Running out of time or failing after some images were rewritten yields
    /// `RefTagError::PartialMerge`; the source tag then stays active.
    pub fn merge_tags(&self, source_tag_id: &str, target_tag_id: &str) -> Result<MergeReport> {
        self.logged(
            "tag.merge",
            Some(format!("{source_tag_id}->{target_tag_id}")),
            json!({ "source_tag_id": source_tag_id, "target_tag_id": target_tag_id }),
            || {
                if source_tag_id == target_tag_id {
                    return Err(RefTagError::Validation(format!(
                        "cannot merge tag into itself: {source_tag_id}"
                    )));
                }
                let source = self.get_tag(source_tag_id)?;
                let target = self.get_tag(target_tag_id)?;
                for tag in [&source, &target] {
                    if !tag.is_active {
                        return Err(RefTagError::Validation(format!(
                            "cannot merge inactive tag: {}",
                            tag.id
                        )));
                    }
                }
                let categories = self.active_categories()?;
                merge_tags(
                    &self.state,
                    &self.state,
                    &categories,
                    &source,
                    &target,
                    self.merge_deadline(),
                )
            },
        )
    }

    /// Recomputes usage counts of one category from the corpus.
    pub fn recount_tag_usage(&self, category_key: &str) -> Result<Vec<UsageRecount>> {
        self.logged(
            "tag.recount",
            Some(category_key.to_string()),
            json!({}),
            || {
                let categories = self.active_categories()?;
                let category = find_category(&categories, category_key)?;
                recount_usage(&self.state, &self.state, category)
            },
        )
    }
}
