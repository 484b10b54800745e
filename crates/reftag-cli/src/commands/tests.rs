use std::fs;
use std::path::Path;

use reftag_core::models::{ImageFilter, TagFilter};
use reftag_core::{AppConfig, RefTag, RefTagError};
use tempfile::tempdir;

use super::support::parse_fields_arg;
use super::validation::{validate_command_preflight, validate_tag_values_selection};
use crate::cli::{
    Commands, ImageArgs, ImageCommand, LogsArgs, SearchArgs, TagArgs, TagCommand, VocabArgs,
    VocabCommand,
};

fn run(app: &RefTag, root: &Path, command: Commands) -> anyhow::Result<()> {
    validate_command_preflight(&command)?;
    super::run_validated(app, root, command)
}

fn write_vocab(root: &Path) -> std::path::PathBuf {
    let path = root.join("vocab.json");
    fs::write(
        &path,
        r#"{"name":"studio","categories":[{"key":"style","storage_path":"tags.style","storage_type":"array","search_weight":2}]}"#,
    )
    .expect("write vocab");
    path
}

#[test]
fn fields_arg_must_be_a_json_object() {
    assert!(parse_fields_arg(None).expect("none").is_empty());
    let fields = parse_fields_arg(Some(r#"{"tags":{"style":["retro"]}}"#)).expect("object");
    assert!(fields.contains_key("tags"));
    assert!(parse_fields_arg(Some("[1,2]")).is_err());
    assert!(parse_fields_arg(Some("{oops")).is_err());
}

#[test]
fn tag_values_selection_requires_values_or_clear() {
    assert!(validate_tag_values_selection(&[], false).is_err());
    assert!(validate_tag_values_selection(&["a".to_string()], true).is_err());
    validate_tag_values_selection(&[], true).expect("clear");
    validate_tag_values_selection(&["a".to_string()], false).expect("values");
}

#[test]
fn image_tag_without_values_fails_preflight() {
    let command = Commands::Image(ImageArgs {
        command: ImageCommand::Tag {
            image_id: "img-1".to_string(),
            category: "style".to_string(),
            values: Vec::new(),
            clear: false,
        },
    });
    assert!(validate_command_preflight(&command).is_err());
}

#[test]
fn vocab_image_tag_and_search_flow() {
    let temp = tempdir().expect("tempdir");
    let app = RefTag::with_config(temp.path(), AppConfig::default()).expect("app");
    run(&app, temp.path(), Commands::Init).expect("init");

    let vocab = write_vocab(temp.path());
    run(
        &app,
        temp.path(),
        Commands::Vocab(VocabArgs {
            command: VocabCommand::Import {
                file: vocab,
                activate: true,
            },
        }),
    )
    .expect("vocab import");

    run(
        &app,
        temp.path(),
        Commands::Image(ImageArgs {
            command: ImageCommand::Add {
                file_name: "poster.jpg".to_string(),
                id: Some("img-1".to_string()),
                file_url: None,
                thumbnail_url: None,
                status: None,
                fields: None,
            },
        }),
    )
    .expect("image add");

    run(
        &app,
        temp.path(),
        Commands::Image(ImageArgs {
            command: ImageCommand::Tag {
                image_id: "img-1".to_string(),
                category: "style".to_string(),
                values: vec!["Retro".to_string()],
                clear: false,
            },
        }),
    )
    .expect("image tag");

    let tags = app.list_tags(&TagFilter::active_in("style")).expect("tags");
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].times_used, 1);
    let images = app.list_images(&ImageFilter::all()).expect("images");
    assert_eq!(images[0].fields["tags"]["style"], serde_json::json!(["retro"]));

    run(
        &app,
        temp.path(),
        Commands::Search(SearchArgs {
            keywords: vec!["retro".to_string()],
        }),
    )
    .expect("search");

    run(
        &app,
        temp.path(),
        Commands::Logs(LogsArgs { limit: 5 }),
    )
    .expect("logs");
}

#[test]
fn search_without_vocabulary_exits_with_error() {
    let temp = tempdir().expect("tempdir");
    let app = RefTag::with_config(temp.path(), AppConfig::default()).expect("app");

    let err = run(
        &app,
        temp.path(),
        Commands::Search(SearchArgs {
            keywords: vec!["retro".to_string()],
        }),
    )
    .expect_err("configuration missing");
    assert!(err.to_string().contains("CONFIGURATION_MISSING"));
}

#[test]
fn tag_merge_surfaces_core_errors() {
    let temp = tempdir().expect("tempdir");
    let app = RefTag::with_config(temp.path(), AppConfig::default()).expect("app");
    let err = run(
        &app,
        temp.path(),
        Commands::Tag(TagArgs {
            command: TagCommand::Merge {
                source: "a".to_string(),
                target: "b".to_string(),
            },
        }),
    )
    .expect_err("missing tags");
    assert!(err.to_string().contains("not found"));
}

#[test]
fn core_errors_become_payloads_named_after_the_command() {
    let merge = Commands::Tag(TagArgs {
        command: TagCommand::Merge {
            source: "a".to_string(),
            target: "b".to_string(),
        },
    });
    let operation = super::command_operation(&merge);
    assert_eq!(operation, "tag.merge");

    let err = anyhow::Error::from(RefTagError::PartialMerge {
        source_tag: "a".to_string(),
        rewritten: 3,
        failed_image_id: Some("img-4".to_string()),
        reason: "disk full".to_string(),
    })
    .context("merge interrupted");
    let payload = super::error_payload(&err, operation).expect("core error payload");
    assert_eq!(payload.code, "PARTIAL_MERGE");
    assert_eq!(payload.operation, "tag.merge");
    let details = payload.details.expect("partial merge details");
    assert_eq!(details["rewritten"], 3);
    assert_eq!(details["failed_image_id"], "img-4");

    let plain = anyhow::anyhow!("--fields must be a JSON object");
    assert!(super::error_payload(&plain, "image.add").is_none());
}
