mod parse;
mod resolve;
mod validate;

pub use parse::{parse_config_document, parse_config_file};
pub use resolve::{find_category, get_active_categories, get_active_config};
pub use validate::{
    RESERVED_RECORD_FIELDS, canonical_tag_value, normalize_tag_value, validate_config_document,
};
