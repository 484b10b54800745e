use clap::Args;

use super::parsers::parse_min_one_usize;

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Keywords matched against every category of the active vocabulary.
    #[arg(required = true, allow_hyphen_values = true)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[arg(long, default_value_t = 20, value_parser = parse_min_one_usize)]
    pub limit: usize,
}
