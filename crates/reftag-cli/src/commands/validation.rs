use anyhow::{Result, bail};

use crate::cli::{Commands, ImageCommand};

use super::support::parse_fields_arg;

pub(super) fn validate_command_preflight(command: &Commands) -> Result<()> {
    if let Commands::Image(args) = command {
        match &args.command {
            ImageCommand::Add { fields, .. } => {
                parse_fields_arg(fields.as_deref())?;
            }
            ImageCommand::Tag { values, clear, .. } => {
                validate_tag_values_selection(values, *clear)?;
            }
            _ => {}
        }
    }
    Ok(())
}

pub(super) fn validate_tag_values_selection(values: &[String], clear: bool) -> Result<()> {
    match (values.is_empty(), clear) {
        (true, false) => bail!("image tag requires at least one --value, or --clear"),
        (false, true) => bail!("--clear cannot be combined with --value"),
        _ => Ok(()),
    }
}
