use crate::error::{RefTagError, Result};
use crate::models::{Category, VocabularyConfig};
use crate::store::VocabularyStore;

pub fn get_active_config(store: &dyn VocabularyStore) -> Result<VocabularyConfig> {
    store
        .fetch_active_vocabulary_config()?
        .ok_or(RefTagError::ConfigurationMissing)
}

/// Ordered category list of the active configuration. An active configuration with
/// no categories is treated the same as no configuration at all.
pub fn get_active_categories(store: &dyn VocabularyStore) -> Result<Vec<Category>> {
    let config = get_active_config(store)?;
    if config.categories.is_empty() {
        return Err(RefTagError::ConfigurationMissing);
    }
    Ok(config.categories)
}

pub fn find_category<'a>(categories: &'a [Category], key: &str) -> Result<&'a Category> {
    categories
        .iter()
        .find(|category| category.key == key)
        .ok_or_else(|| RefTagError::CategoryNotFound(key.to_string()))
}
