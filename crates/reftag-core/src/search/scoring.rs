use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{Category, ImageRecord, ScoredImage};

/// Scores one image against every keyword and category.
///
/// List categories match when an element contains the keyword or the keyword contains
/// the element; text categories only match when the value contains the keyword.
/// A keyword earns a category's weight at most once, however many elements hit.
pub(super) fn score_image(
    image: &ImageRecord,
    keywords: &[String],
    categories: &[Category],
) -> ScoredImage {
    let mut score = 0u32;
    let mut matched_keywords = Vec::<String>::new();
    let mut matched_on = BTreeMap::<String, Vec<String>>::new();

    for keyword in keywords {
        for category in categories {
            let Some(value) = category.storage_path.read(&image.fields) else {
                continue;
            };
            let hits = if category.storage_type.is_list() {
                list_hits(value, keyword)
            } else {
                text_hits(value, keyword)
            };
            if hits.is_empty() {
                continue;
            }

            score = score.saturating_add(category.search_weight);
            if !matched_keywords.contains(keyword) {
                matched_keywords.push(keyword.clone());
            }
            let slot = matched_on.entry(category.key.clone()).or_default();
            for hit in hits {
                if !slot.contains(&hit) {
                    slot.push(hit);
                }
            }
        }
    }

    ScoredImage {
        id: image.id.clone(),
        status: image.status,
        file_name: image.file_name.clone(),
        file_url: image.file_url.clone(),
        thumbnail_url: image.thumbnail_url.clone(),
        score,
        matched_keywords,
        matched_on,
        categories: project_categories(image, categories),
    }
}

fn list_hits(value: &Value, keyword: &str) -> Vec<String> {
    let Some(elements) = value.as_array() else {
        return Vec::new();
    };
    elements
        .iter()
        .filter_map(Value::as_str)
        .filter(|element| {
            let element = element.trim().to_lowercase();
            !element.is_empty() && (element.contains(keyword) || keyword.contains(&element))
        })
        .map(ToString::to_string)
        .collect()
}

fn text_hits(value: &Value, keyword: &str) -> Vec<String> {
    match value.as_str() {
        Some(text) if text.to_lowercase().contains(keyword) => vec![text.to_string()],
        _ => Vec::new(),
    }
}

pub(super) fn project_categories(
    image: &ImageRecord,
    categories: &[Category],
) -> BTreeMap<String, Value> {
    categories
        .iter()
        .map(|category| {
            let value = category
                .storage_path
                .read(&image.fields)
                .cloned()
                .unwrap_or(Value::Null);
            (category.key.clone(), value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::models::{ImageStatus, StorageKind};
    use crate::path::StoragePath;

    use super::*;

    fn image(id: &str, fields: Value) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            status: ImageStatus::Tagged,
            file_name: format!("{id}.png"),
            file_url: None,
            thumbnail_url: None,
            fields: fields.as_object().cloned().expect("object fields"),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn category(key: &str, path: &str, kind: StorageKind, weight: u32) -> Category {
        Category::new(key, StoragePath::parse(path).expect("path"), kind, weight)
    }

    fn keywords(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|k| (*k).to_string()).collect()
    }

    #[test]
    fn text_category_matches_only_when_value_contains_keyword() {
        let categories = vec![category("style", "tags.style", StorageKind::Text, 5)];
        let record = image("a", json!({"tags": {"style": "Modernist"}}));

        let hit = score_image(&record, &keywords(&["modern"]), &categories);
        assert_eq!(hit.score, 5);
        assert_eq!(hit.matched_on["style"], vec!["Modernist".to_string()]);

        let miss = score_image(&record, &keywords(&["modernistic"]), &categories);
        assert_eq!(miss.score, 0);
        assert!(miss.matched_keywords.is_empty());
    }

    #[test]
    fn list_category_matches_in_both_directions() {
        let categories = vec![category("style", "tags.style", StorageKind::Array, 3)];
        let record = image("a", json!({"tags": {"style": ["modernist"]}}));
        assert_eq!(score_image(&record, &keywords(&["modern"]), &categories).score, 3);

        let record = image("b", json!({"tags": {"style": ["modern"]}}));
        let scored = score_image(&record, &keywords(&["modernistic"]), &categories);
        assert_eq!(scored.score, 3);
        assert_eq!(scored.matched_keywords, vec!["modernistic".to_string()]);
    }

    #[test]
    fn keyword_earns_category_weight_once_but_records_every_element() {
        let categories = vec![category("mood", "moods", StorageKind::JsonbArray, 2)];
        let record = image("a", json!({"moods": ["calm", "calming", "calm"]}));
        let scored = score_image(&record, &keywords(&["calm"]), &categories);

        assert_eq!(scored.score, 2);
        assert_eq!(
            scored.matched_on["mood"],
            vec!["calm".to_string(), "calming".to_string()]
        );
    }

    #[test]
    fn score_accumulates_across_categories_and_keywords() {
        let categories = vec![
            category("industry", "industries", StorageKind::Array, 2),
            category("style", "tags.style", StorageKind::Array, 3),
        ];
        let record = image(
            "a",
            json!({"industries": ["retail"], "tags": {"style": ["retro", "retail-pop"]}}),
        );
        let scored = score_image(&record, &keywords(&["retail", "retro"]), &categories);
        assert_eq!(scored.score, 2 + 3 + 3);
        assert_eq!(
            scored.matched_keywords,
            vec!["retail".to_string(), "retro".to_string()]
        );
    }

    #[test]
    fn unresolved_or_mistyped_values_score_zero_without_failing() {
        let categories = vec![
            category("style", "tags.style", StorageKind::Array, 3),
            category("mood", "mood", StorageKind::Text, 4),
            category("industry", "industries", StorageKind::Array, 2),
        ];
        let record = image(
            "a",
            json!({"tags": "flat", "mood": ["calm"], "industries": [1, null, ""]}),
        );
        let scored = score_image(&record, &keywords(&["calm", "flat"]), &categories);
        assert_eq!(scored.score, 0);
        assert_eq!(scored.categories["style"], Value::Null);
        assert_eq!(scored.categories["mood"], json!(["calm"]));
    }
}
