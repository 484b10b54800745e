use std::collections::HashMap;

use crate::error::Result;
use crate::models::{Category, ImageFilter, TagFilter, TagPatch, UsageRecount};
use crate::store::{ImageCorpus, TagStore};
use crate::vocabulary::canonical_tag_value;

/// Number of images referencing each value of `category`, keyed by canonical tag
/// value. A list holding a value twice, in any casing, counts once.
pub fn count_references(
    corpus: &dyn ImageCorpus,
    category: &Category,
) -> Result<HashMap<String, u64>> {
    let mut counts = HashMap::<String, u64>::new();
    for image in corpus.fetch_images(&ImageFilter::all())? {
        let Some(value) = category.storage_path.read(&image.fields) else {
            continue;
        };
        let mut seen = Vec::<String>::new();
        if category.storage_type.is_list() {
            if let Some(elements) = value.as_array() {
                seen.extend(
                    elements
                        .iter()
                        .filter_map(serde_json::Value::as_str)
                        .map(canonical_tag_value),
                );
            }
        } else if let Some(text) = value.as_str() {
            seen.push(canonical_tag_value(text));
        }
        seen.sort_unstable();
        seen.dedup();
        for tag_value in seen.into_iter().filter(|v| !v.is_empty()) {
            *counts.entry(tag_value).or_default() += 1;
        }
    }
    Ok(counts)
}

/// Recomputes `times_used` for every active tag of `category`; returns the tags whose
/// count changed.
pub fn recount_usage(
    corpus: &dyn ImageCorpus,
    tags: &dyn TagStore,
    category: &Category,
) -> Result<Vec<UsageRecount>> {
    let counts = count_references(corpus, category)?;
    let mut changed = Vec::new();
    for tag in tags.fetch_tags(&TagFilter::active_in(&category.key))? {
        let times_used = counts.get(&tag.tag_value).copied().unwrap_or(0);
        if times_used == tag.times_used {
            continue;
        }
        tags.update_tag(
            &tag.id,
            &TagPatch {
                times_used: Some(times_used),
                ..TagPatch::default()
            },
        )?;
        changed.push(UsageRecount {
            tag_id: tag.id,
            tag_value: tag.tag_value,
            previous: tag.times_used,
            times_used,
        });
    }
    Ok(changed)
}
