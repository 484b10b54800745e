use std::path::Path;

use serde_json::{Value, json};

use crate::error::{RefTagError, Result};
use crate::models::{
    Category, ImageFilter, ImagePatch, ImageRecord, ImageStatus, NewImage, NewTag, TagImageResult,
    TagPatch,
};
use crate::vocabulary::{canonical_tag_value, find_category, normalize_tag_value};

use super::RefTag;

impl RefTag {
    pub fn add_image(&self, image: &NewImage) -> Result<ImageRecord> {
        self.logged(
            "image.add",
            image.id.clone(),
            json!({ "file_name": image.file_name }),
            || self.state.insert_image(image),
        )
    }

    /// Imports a JSON array of image documents. Stops at the first rejected image;
    /// images inserted before it are kept.
    pub fn import_images(&self, path: &Path) -> Result<Vec<ImageRecord>> {
        let raw = std::fs::read_to_string(path)?;
        let images = serde_json::from_str::<Vec<NewImage>>(&raw).map_err(|err| {
            RefTagError::Validation(format!("invalid image document {}: {err}", path.display()))
        })?;
        self.logged(
            "image.import",
            Some(path.display().to_string()),
            json!({ "images": images.len() }),
            || images.iter().map(|image| self.state.insert_image(image)).collect(),
        )
    }

    pub fn get_image(&self, image_id: &str) -> Result<ImageRecord> {
        self.state
            .get_image(image_id)?
            .ok_or_else(|| RefTagError::NotFound(format!("image {image_id}")))
    }

    pub fn list_images(&self, filter: &ImageFilter) -> Result<Vec<ImageRecord>> {
        self.state.list_images(filter)
    }

    pub fn set_image_status(&self, image_id: &str, status: ImageStatus) -> Result<ImageRecord> {
        self.logged(
            "image.status",
            Some(image_id.to_string()),
            json!({ "status": status }),
            || {
                self.state.apply_image_patch(
                    image_id,
                    &ImagePatch {
                        fields: Default::default(),
                        status: Some(status),
                    },
                )
            },
        )
    }

    /// Replaces the values an image holds for one category and keeps tag usage
    /// counts in step. Unknown values become new active tags.
    ///
    /// A text category takes at most one value; an empty list clears it. A pending
    /// image becomes tagged.
    pub fn tag_image<S: AsRef<str>>(
        &self,
        image_id: &str,
        category_key: &str,
        values: &[S],
    ) -> Result<TagImageResult> {
        let requested = values
            .iter()
            .map(|value| value.as_ref().to_string())
            .collect::<Vec<_>>();
        self.logged(
            "image.tag",
            Some(image_id.to_string()),
            json!({ "category": category_key, "values": requested }),
            || {
                let categories = self.active_categories()?;
                let category = find_category(&categories, category_key)?;
                let image = self.get_image(image_id)?;

                let mut next = Vec::<String>::new();
                for value in &requested {
                    let value = normalize_tag_value(value)?;
                    if !next.contains(&value) {
                        next.push(value);
                    }
                }
                if !category.storage_type.is_list() && next.len() > 1 {
                    return Err(RefTagError::Validation(format!(
                        "text category {} takes at most one value",
                        category.key
                    )));
                }

                let previous = held_values(category, &image);
                let added = next
                    .iter()
                    .filter(|value| !previous.contains(value))
                    .cloned()
                    .collect::<Vec<_>>();
                let removed = previous
                    .iter()
                    .filter(|value| !next.contains(value))
                    .cloned()
                    .collect::<Vec<_>>();

                let stored = if category.storage_type.is_list() {
                    Value::Array(next.iter().cloned().map(Value::String).collect())
                } else {
                    Value::String(next.first().cloned().unwrap_or_default())
                };
                let updated_fields = category.storage_path.with_value(&image.fields, stored)?;
                let patch = ImagePatch {
                    fields: category.storage_path.root_patch(&updated_fields),
                    status: (image.status == ImageStatus::Pending).then_some(ImageStatus::Tagged),
                };
                let image = self.state.apply_image_patch(&image.id, &patch)?;

                let mut created_tags = Vec::new();
                for value in &added {
                    match self.state.find_active_tag(&category.key, value)? {
                        Some(tag) => {
                            self.state.apply_tag_patch(
                                &tag.id,
                                &TagPatch {
                                    times_used: Some(tag.times_used.saturating_add(1)),
                                    ..TagPatch::default()
                                },
                            )?;
                        }
                        None => {
                            let tag = self.state.create_tag(&NewTag {
                                category: category.key.clone(),
                                tag_value: value.clone(),
                                times_used: 1,
                            })?;
                            created_tags.push(tag.id);
                        }
                    }
                }
                for value in &removed {
                    if let Some(tag) = self.state.find_active_tag(&category.key, value)? {
                        self.state.apply_tag_patch(
                            &tag.id,
                            &TagPatch {
                                times_used: Some(tag.times_used.saturating_sub(1)),
                                ..TagPatch::default()
                            },
                        )?;
                    }
                }

                Ok(TagImageResult {
                    image,
                    category: category.key.clone(),
                    added,
                    removed,
                    created_tags,
                })
            },
        )
    }
}

fn held_values(category: &Category, image: &ImageRecord) -> Vec<String> {
    let Some(value) = category.storage_path.read(&image.fields) else {
        return Vec::new();
    };
    let mut held = Vec::<String>::new();
    let raw = if category.storage_type.is_list() {
        value
            .as_array()
            .map(|elements| elements.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default()
    } else {
        value.as_str().into_iter().collect()
    };
    for text in raw.into_iter().map(canonical_tag_value) {
        if !text.is_empty() && !held.contains(&text) {
            held.push(text);
        }
    }
    held
}
