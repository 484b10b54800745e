use std::time::Instant;

use serde_json::Value;

use crate::error::{RefTagError, Result};
use crate::models::{Category, ImageFilter, ImagePatch, ReconcileStats, StorageKind};
use crate::store::ImageCorpus;
use crate::vocabulary::canonical_tag_value;

const DEADLINE_EXCEEDED_REASON: &str = "operation deadline exceeded";

/// Returns the replacement for `value` when it references `from`, `None` otherwise.
///
/// `from` and `to` are canonical tag values; stored values are compared in canonical
/// form, so `"Mid-Century"` is a reference to `mid-century`. Lists drop every `from`
/// element and gain `to` once, unless `to` is already present. Text values are
/// replaced only when the whole value matches.
#[must_use]
pub fn rewrite_value(kind: StorageKind, value: &Value, from: &str, to: &str) -> Option<Value> {
    if !references(kind, value, from) {
        return None;
    }
    if kind.is_list() {
        let elements = value.as_array()?;
        let mut rewritten = elements
            .iter()
            .filter(|element| !holds(element, from))
            .cloned()
            .collect::<Vec<_>>();
        if !rewritten.iter().any(|element| holds(element, to)) {
            rewritten.push(Value::String(to.to_string()));
        }
        return Some(Value::Array(rewritten));
    }
    Some(Value::String(to.to_string()))
}

fn holds(element: &Value, tag_value: &str) -> bool {
    element
        .as_str()
        .is_some_and(|text| canonical_tag_value(text) == tag_value)
}

fn references(kind: StorageKind, value: &Value, tag_value: &str) -> bool {
    if kind.is_list() {
        return value
            .as_array()
            .is_some_and(|elements| elements.iter().any(|element| holds(element, tag_value)));
    }
    holds(value, tag_value)
}

/// Rewrites `from` to `to` in `category` across the whole corpus.
///
/// Images that do not reference `from` are not written. A failed write, or reaching
/// `deadline` between writes, stops the pass; once at least one image has been
/// rewritten that stop is reported as a partial merge.
pub fn reconcile_tag_value(
    corpus: &dyn ImageCorpus,
    category: &Category,
    from: &str,
    to: &str,
    deadline: Option<Instant>,
) -> Result<ReconcileStats> {
    let images = corpus.fetch_images(&ImageFilter::all())?;
    let mut stats = ReconcileStats {
        images_scanned: images.len(),
        ..ReconcileStats::default()
    };

    for image in images {
        let current = category.storage_path.read(&image.fields);
        let Some(replacement) =
            current.and_then(|value| rewrite_value(category.storage_type, value, from, to))
        else {
            if current.is_some_and(|value| references(category.storage_type, value, to)) {
                stats.replacement_references += 1;
            }
            continue;
        };

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(RefTagError::PartialMerge {
                source_tag: from.to_string(),
                rewritten: stats.images_rewritten,
                failed_image_id: None,
                reason: DEADLINE_EXCEEDED_REASON.to_string(),
            });
        }

        let written = category
            .storage_path
            .with_value(&image.fields, replacement)
            .and_then(|updated| {
                let patch = ImagePatch::fields(category.storage_path.root_patch(&updated));
                corpus.update_image(&image.id, &patch)
            });
        if let Err(err) = written {
            if stats.images_rewritten == 0 {
                return Err(err);
            }
            return Err(RefTagError::PartialMerge {
                source_tag: from.to_string(),
                rewritten: stats.images_rewritten,
                failed_image_id: Some(image.id),
                reason: err.to_string(),
            });
        }

        stats.images_rewritten += 1;
        stats.replacement_references += 1;
        stats.rewritten_image_ids.push(image.id);
    }

    Ok(stats)
}
