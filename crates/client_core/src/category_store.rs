use shared::protocol::GalleryCategory;
use tracing::{info, warn};

use crate::{GalleryApi, Result};

/// Categories loaded for one page view, used to resolve item labels.
///
/// Items reference categories by `value` without any integrity guarantee,
/// so lookups fall back to the raw value instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStore {
    categories: Vec<GalleryCategory>,
}

impl CategoryStore {
    pub fn new(categories: Vec<GalleryCategory>) -> Self {
        Self { categories }
    }

    pub async fn load(api: &dyn GalleryApi) -> Result<Self> {
        let categories = api.list_categories().await?;
        info!(count = categories.len(), "categories: loaded public list");
        Ok(Self::new(categories))
    }

    pub async fn load_admin(api: &dyn GalleryApi) -> Result<Self> {
        let categories = api.list_categories_admin().await?;
        info!(count = categories.len(), "categories: loaded admin list");
        Ok(Self::new(categories))
    }

    /// Page-mount variant of [`CategoryStore::load`]: a failure is logged and
    /// yields an empty store so the page still renders.
    pub async fn load_or_empty(api: &dyn GalleryApi) -> Self {
        match Self::load(api).await {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "categories: failed to load, labels fall back to raw values");
                Self::default()
            }
        }
    }

    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.categories
            .iter()
            .find(|category| category.value == value)
            .map(|category| category.label.as_str())
            .unwrap_or(value)
    }

    /// `(value, label)` pairs in server order, for filter and form selects.
    pub fn options(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .map(|category| (category.value.as_str(), category.label.as_str()))
    }

    pub fn categories(&self) -> &[GalleryCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(value: &str, label: &str) -> GalleryCategory {
        GalleryCategory {
            id: None,
            value: value.to_string(),
            label: label.to_string(),
            description: None,
            sort_order: 0,
        }
    }

    #[test]
    fn label_for_resolves_known_values() {
        let store = CategoryStore::new(vec![
            category("kegiatan", "Kegiatan Desa"),
            category("wisata", "Wisata"),
        ]);
        assert_eq!(store.label_for("kegiatan"), "Kegiatan Desa");
        assert_eq!(store.label_for("wisata"), "Wisata");
    }

    #[test]
    fn label_for_is_identity_on_unknown_values_and_stable() {
        let store = CategoryStore::new(vec![category("kegiatan", "Kegiatan Desa")]);
        let first = store.label_for("dihapus").to_string();
        let second = store.label_for("dihapus").to_string();
        assert_eq!(first, "dihapus");
        assert_eq!(first, second);
        assert_eq!(CategoryStore::default().label_for(""), "");
    }

    #[test]
    fn options_keep_server_order() {
        let store = CategoryStore::new(vec![category("b", "B"), category("a", "A")]);
        let values: Vec<_> = store.options().map(|(value, _)| value).collect();
        assert_eq!(values, vec!["b", "a"]);
    }
}
