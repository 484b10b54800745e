use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TagArgs {
    #[command(subcommand)]
    pub command: TagCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    Add {
        category: String,
        value: String,
    },
    Rename {
        tag_id: String,
        value: String,
    },
    /// Fold the source tag into the target tag across every image.
    Merge {
        #[arg(long)]
        source: String,
        #[arg(long)]
        target: String,
    },
    List {
        #[arg(long)]
        category: Option<String>,
        /// Include deactivated tags.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    Recount {
        category: String,
    },
}
