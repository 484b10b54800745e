use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod image;
mod parsers;
mod tag;
mod vocab;


pub use args::{LogsArgs, SearchArgs};
pub use image::{ImageArgs, ImageCommand};
pub use tag::{TagArgs, TagCommand};
pub use vocab::{VocabArgs, VocabCommand};

#[derive(Debug, Parser)]
#[command(name = "reftag")]
#[command(about = "Reference-image tagging and vocabulary search", version)]
pub struct Cli {
    #[arg(long, default_value = ".reftag")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Init,
    Vocab(VocabArgs),
    Tag(TagArgs),
    Image(ImageArgs),
    Search(SearchArgs),
    Logs(LogsArgs),
}
