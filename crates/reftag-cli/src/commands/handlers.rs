use anyhow::{Result, bail};
use reftag_core::RefTag;
use reftag_core::models::{ImageFilter, NewImage, TagFilter, VocabularyConfig};

use crate::cli::{ImageCommand, TagCommand, VocabCommand};

use super::support::{parse_fields_arg, print_json};

pub(super) fn handle_vocab(app: &RefTag, command: VocabCommand) -> Result<()> {
    match command {
        VocabCommand::Import { file, activate } => {
            let config = app.import_vocabulary_file(&file, activate)?;
            print_json(&config)?;
        }
        VocabCommand::Activate { id } => {
            let config = app.activate_vocabulary_config(&id)?;
            print_json(&config)?;
        }
        VocabCommand::Show { id } => {
            let config: VocabularyConfig = match id {
                Some(id) => app.get_vocabulary_config(&id)?,
                None => app.active_vocabulary_config()?,
            };
            print_json(&config)?;
        }
        VocabCommand::List => {
            print_json(&app.list_vocabulary_configs()?)?;
        }
    }
    Ok(())
}

pub(super) fn handle_tag(app: &RefTag, command: TagCommand) -> Result<()> {
    match command {
        TagCommand::Add { category, value } => {
            print_json(&app.add_tag(&category, &value)?)?;
        }
        TagCommand::Rename { tag_id, value } => {
            print_json(&app.rename_tag(&tag_id, &value)?)?;
        }
        TagCommand::Merge { source, target } => {
            print_json(&app.merge_tags(&source, &target)?)?;
        }
        TagCommand::List { category, all } => {
            let filter = TagFilter {
                category,
                is_active: (!all).then_some(true),
            };
            print_json(&app.list_tags(&filter)?)?;
        }
        TagCommand::Recount { category } => {
            let changed = app.recount_tag_usage(&category)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "category": category,
                "changed": changed,
            }))?;
        }
    }
    Ok(())
}

pub(super) fn handle_image(app: &RefTag, command: ImageCommand) -> Result<()> {
    match command {
        ImageCommand::Add {
            file_name,
            id,
            file_url,
            thumbnail_url,
            status,
            fields,
        } => {
            let image = NewImage {
                id,
                file_name,
                file_url,
                thumbnail_url,
                status,
                fields: parse_fields_arg(fields.as_deref())?,
            };
            print_json(&app.add_image(&image)?)?;
        }
        ImageCommand::Import { file } => {
            let images = app.import_images(&file)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "imported": images.len(),
                "ids": images.iter().map(|image| image.id.as_str()).collect::<Vec<_>>(),
            }))?;
        }
        ImageCommand::Tag {
            image_id,
            category,
            values,
            clear: _,
        } => {
            print_json(&app.tag_image(&image_id, &category, &values)?)?;
        }
        ImageCommand::Status { image_id, status } => {
            print_json(&app.set_image_status(&image_id, status)?)?;
        }
        ImageCommand::Show { image_id } => {
            print_json(&app.get_image(&image_id)?)?;
        }
        ImageCommand::List { statuses } => {
            let filter = if statuses.is_empty() {
                ImageFilter::all()
            } else {
                ImageFilter::with_statuses(&statuses)
            };
            print_json(&app.list_images(&filter)?)?;
        }
    }
    Ok(())
}

pub(super) fn handle_search(app: &RefTag, keywords: &[String]) -> Result<()> {
    let response = app.search_images(keywords)?;
    print_json(&response)?;
    if let Some(error) = &response.error {
        let code = response.error_code.as_deref().unwrap_or("SEARCH_FAILED");
        bail!("{code}: {error}");
    }
    Ok(())
}

pub(super) fn handle_logs(app: &RefTag, limit: usize) -> Result<()> {
    print_json(&app.recent_request_logs(limit)?)?;
    Ok(())
}
