use serde_json::json;
use tempfile::tempdir;

use crate::models::{Category, ImageStatus, NewImage, StorageKind};
use crate::path::{RecordFields, StoragePath};

use super::*;

fn style_category() -> Category {
    Category::new(
        "style",
        StoragePath::parse("tags.style").expect("path"),
        StorageKind::Array,
        3,
    )
}

fn new_image(id: &str, fields: serde_json::Value) -> NewImage {
    NewImage {
        id: Some(id.to_string()),
        file_name: format!("{id}.png"),
        fields: fields.as_object().cloned().expect("object fields"),
        ..NewImage::default()
    }
}

#[test]
fn open_migrates_and_round_trips_vocabulary_config() {
    let temp = tempdir().expect("tempdir");
    let store = SqliteStateStore::open(temp.path().join("state.db")).expect("open failed");
    assert!(store.active_vocabulary_config().expect("active").is_none());

    let saved = store
        .insert_vocabulary_config("studio", &[style_category()], true)
        .expect("insert config");
    let active = store
        .active_vocabulary_config()
        .expect("active")
        .expect("active config");
    assert_eq!(active.id, saved.id);
    assert_eq!(active.categories, vec![style_category()]);
}

#[cfg(unix)]
#[test]
fn open_hardens_state_db_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("state.db");
    let _store = SqliteStateStore::open(&db_path).expect("open failed");

    let mode = std::fs::metadata(&db_path)
        .expect("metadata")
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}

#[test]
fn activating_a_config_deactivates_the_previous_one() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    let first = store
        .insert_vocabulary_config("first", &[style_category()], true)
        .expect("first");
    let second = store
        .insert_vocabulary_config("second", &[style_category()], false)
        .expect("second");

    let activated = store
        .activate_vocabulary_config(&second.id)
        .expect("activate");
    assert!(activated.is_active);

    let listed = store.list_vocabulary_configs().expect("list");
    let active_ids = listed
        .iter()
        .filter(|summary| summary.is_active)
        .map(|summary| summary.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(active_ids, vec![second.id]);
    assert!(listed.iter().any(|summary| summary.id == first.id && !summary.is_active));

    let err = store
        .activate_vocabulary_config("missing")
        .expect_err("missing config");
    assert!(matches!(err, RefTagError::NotFound(_)));
}

#[test]
fn image_patch_replaces_only_named_top_level_fields() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    store
        .insert_image(&new_image(
            "img-1",
            json!({"industries": ["retail"], "tags": {"style": ["modern"], "mood": ["calm"]}}),
        ))
        .expect("insert");

    let mut fields = RecordFields::new();
    fields.insert(
        "tags".to_string(),
        json!({"style": ["retro"], "mood": ["calm"]}),
    );
    let updated = store
        .update_image(
            "img-1",
            &ImagePatch {
                fields,
                status: Some(ImageStatus::Approved),
            },
        )
        .expect("update");

    assert_eq!(updated.status, ImageStatus::Approved);
    assert_eq!(updated.fields["industries"], json!(["retail"]));
    assert_eq!(updated.fields["tags"]["style"], json!(["retro"]));

    let reloaded = store.get_image("img-1").expect("get").expect("image");
    assert_eq!(reloaded.fields, updated.fields);

    let err = store
        .update_image("missing", &ImagePatch::default())
        .expect_err("missing image");
    assert!(matches!(err, RefTagError::NotFound(_)));
}

#[test]
fn list_images_filters_by_status() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    for (id, status) in [
        ("a", ImageStatus::Pending),
        ("b", ImageStatus::Tagged),
        ("c", ImageStatus::Approved),
        ("d", ImageStatus::Skipped),
    ] {
        let mut image = new_image(id, json!({}));
        image.status = Some(status);
        store.insert_image(&image).expect("insert");
    }

    let searchable = store
        .fetch_images(&ImageFilter::with_statuses(&[
            ImageStatus::Tagged,
            ImageStatus::Approved,
        ]))
        .expect("filtered");
    let mut ids = searchable
        .iter()
        .map(|image| image.id.as_str())
        .collect::<Vec<_>>();
    ids.sort_unstable();
    assert_eq!(ids, vec!["b", "c"]);

    assert_eq!(store.fetch_images(&ImageFilter::all()).expect("all").len(), 4);
    assert!(
        store
            .fetch_images(&ImageFilter::with_statuses(&[]))
            .expect("none")
            .is_empty()
    );
}

#[test]
fn duplicate_image_id_is_a_conflict() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    store
        .insert_image(&new_image("img-1", json!({})))
        .expect("insert");
    let err = store
        .insert_image(&new_image("img-1", json!({})))
        .expect_err("duplicate");
    assert!(matches!(err, RefTagError::Conflict(_)));
}

#[test]
fn active_tag_values_are_unique_per_category() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    let retro = store
        .insert_tag(&NewTag {
            category: "style".to_string(),
            tag_value: "retro".to_string(),
            times_used: 0,
        })
        .expect("insert");

    let err = store
        .insert_tag(&NewTag {
            category: "style".to_string(),
            tag_value: "retro".to_string(),
            times_used: 0,
        })
        .expect_err("duplicate active value");
    assert!(matches!(err, RefTagError::Conflict(_)));

    store
        .insert_tag(&NewTag {
            category: "mood".to_string(),
            tag_value: "retro".to_string(),
            times_used: 0,
        })
        .expect("same value in another category");

    store
        .update_tag(
            &retro.id,
            &TagPatch {
                is_active: Some(false),
                ..TagPatch::default()
            },
        )
        .expect("deactivate");
    store
        .insert_tag(&NewTag {
            category: "style".to_string(),
            tag_value: "retro".to_string(),
            times_used: 0,
        })
        .expect("value free again once the old tag is inactive");

    let inactive = store
        .fetch_tags(&TagFilter {
            category: Some("style".to_string()),
            is_active: Some(false),
        })
        .expect("inactive");
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].id, retro.id);
}

#[test]
fn tag_patch_rename_onto_active_value_conflicts() {
    let store = SqliteStateStore::open_in_memory().expect("open");
    let insert = |value: &str| {
        store
            .insert_tag(&NewTag {
                category: "style".to_string(),
                tag_value: value.to_string(),
                times_used: 2,
            })
            .expect("insert")
    };
    let modern = insert("modern");
    insert("retro");

    let err = store
        .update_tag(
            &modern.id,
            &TagPatch {
                tag_value: Some("retro".to_string()),
                ..TagPatch::default()
            },
        )
        .expect_err("conflict");
    assert!(matches!(err, RefTagError::Conflict(_)));

    let found = store
        .find_active_tag("style", "modern")
        .expect("find")
        .expect("still present");
    assert_eq!(found.times_used, 2);
}
