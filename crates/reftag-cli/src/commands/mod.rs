use std::path::Path;

use anyhow::{Context, Result};
use reftag_core::RefTag;
use reftag_core::error::{ErrorPayload, RefTagError};

use crate::cli::{Commands, ImageCommand, TagCommand, VocabCommand};

mod handlers;
mod support;
mod validation;

use self::handlers::{handle_image, handle_logs, handle_search, handle_tag, handle_vocab};
use self::support::print_json;
use self::validation::validate_command_preflight;

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    validate_command_preflight(&command)?;
    let operation = command_operation(&command);
    let result = RefTag::new(root)
        .context("failed to create app")
        .and_then(|app| run_validated(&app, root, command));
    if let Err(err) = &result
        && let Some(payload) = error_payload(err, operation)
    {
        print_json(&payload)?;
    }
    result
}

/// Core failures are reported on stdout as a structured payload; other errors only reach stderr.
fn error_payload(err: &anyhow::Error, operation: &str) -> Option<ErrorPayload> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<RefTagError>())
        .map(|core| core.to_payload(operation, None))
}

const fn command_operation(command: &Commands) -> &'static str {
    match command {
        Commands::Init => "init",
        Commands::Vocab(args) => match args.command {
            VocabCommand::Import { .. } => "vocab.import",
            VocabCommand::Activate { .. } => "vocab.activate",
            VocabCommand::Show { .. } => "vocab.show",
            VocabCommand::List => "vocab.list",
        },
        Commands::Tag(args) => match args.command {
            TagCommand::Add { .. } => "tag.add",
            TagCommand::Rename { .. } => "tag.rename",
            TagCommand::Merge { .. } => "tag.merge",
            TagCommand::List { .. } => "tag.list",
            TagCommand::Recount { .. } => "tag.recount",
        },
        Commands::Image(args) => match args.command {
            ImageCommand::Add { .. } => "image.add",
            ImageCommand::Import { .. } => "image.import",
            ImageCommand::Tag { .. } => "image.tag",
            ImageCommand::Status { .. } => "image.status",
            ImageCommand::Show { .. } => "image.show",
            ImageCommand::List { .. } => "image.list",
        },
        Commands::Search(_) => "search",
        Commands::Logs(_) => "logs",
    }
}

fn run_validated(app: &RefTag, root: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            print_json(&serde_json::json!({
                "status": "ok",
                "root": root.display().to_string(),
            }))?;
        }
        Commands::Vocab(args) => handle_vocab(app, args.command)?,
        Commands::Tag(args) => handle_tag(app, args.command)?,
        Commands::Image(args) => handle_image(app, args.command)?,
        Commands::Search(args) => handle_search(app, &args.keywords)?,
        Commands::Logs(args) => handle_logs(app, args.limit)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests;
