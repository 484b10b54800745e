use std::path::PathBuf;

use clap::{Args, Subcommand};
use reftag_core::models::ImageStatus;

use super::parsers::parse_image_status;

#[derive(Debug, Args)]
pub struct ImageArgs {
    #[command(subcommand)]
    pub command: ImageCommand,
}

#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    Add {
        #[arg(long)]
        file_name: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        file_url: Option<String>,
        #[arg(long)]
        thumbnail_url: Option<String>,
        #[arg(long, value_parser = parse_image_status)]
        status: Option<ImageStatus>,
        /// Category fields as a JSON object, e.g. '{"tags":{"style":["retro"]}}'.
        #[arg(long)]
        fields: Option<String>,
    },
    /// Import a JSON array of image documents.
    Import {
        file: PathBuf,
    },
    /// Replace the values an image holds for one category.
    Tag {
        image_id: String,
        #[arg(long)]
        category: String,
        #[arg(long = "value")]
        values: Vec<String>,
        /// Clear the category instead of setting values.
        #[arg(long, default_value_t = false)]
        clear: bool,
    },
    Status {
        image_id: String,
        #[arg(value_parser = parse_image_status)]
        status: ImageStatus,
    },
    Show {
        image_id: String,
    },
    List {
        #[arg(long = "status", value_parser = parse_image_status)]
        statuses: Vec<ImageStatus>,
    },
}
