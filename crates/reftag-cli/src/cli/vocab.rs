use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct VocabArgs {
    #[command(subcommand)]
    pub command: VocabCommand,
}

#[derive(Debug, Subcommand)]
pub enum VocabCommand {
    /// Import a category document (`.json` or `.toml`).
    Import {
        file: PathBuf,
        #[arg(long, default_value_t = false)]
        activate: bool,
    },
    Activate {
        id: String,
    },
    /// Show one configuration, or the active one when no id is given.
    Show {
        id: Option<String>,
    },
    List,
}
