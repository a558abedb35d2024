//! Back-office screens: the item list, the item editor and the category
//! manager. Each owns its own state and reloads from the server after every
//! successful write.

use std::sync::Arc;

use shared::{
    domain::{GalleryCategoryId, GalleryItemId, GalleryStatus, DEFAULT_CATEGORY_VALUE},
    protocol::{CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload},
};
use tracing::{info, warn};

use crate::{
    category_store::CategoryStore,
    error::{MSG_LOAD_CATEGORIES_FAILED, MSG_LOAD_ITEM_FAILED},
    fetcher::{FetchOutcome, ListFetcher, Listing},
    images::{ImageUpload, ImageUrls},
    mutator::AdminMutator,
    query::QueryState,
    view::{self, GalleryCard},
    GalleryApi, ListScope, Result,
};

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone)]
pub struct ItemForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: GalleryStatus,
    /// Filename already stored on the server; empty when there is none.
    pub image: String,
    /// Newly selected file, uploaded on submit.
    pub image_file: Option<ImageUpload>,
}

impl Default for ItemForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY_VALUE.to_string(),
            status: GalleryStatus::Active,
            image: String::new(),
            image_file: None,
        }
    }
}

impl ItemForm {
    pub fn from_item(item: &GalleryItem) -> Self {
        let defaults = Self::default();
        Self {
            title: item.title.clone(),
            description: item.description.clone().unwrap_or_default(),
            category: non_blank(&item.category).unwrap_or(defaults.category),
            status: item.status,
            image: item.image.clone().unwrap_or_default(),
            image_file: None,
        }
    }

    pub fn select_image(&mut self, upload: ImageUpload) {
        self.image_file = Some(upload);
    }

    /// Drops both the pending file and the stored filename.
    pub fn remove_image(&mut self) {
        self.image_file = None;
        self.image.clear();
    }

    pub fn to_payload(&self, image: String) -> GalleryItemPayload {
        GalleryItemPayload {
            title: self.title.clone(),
            description: non_blank(&self.description),
            category: self.category.clone(),
            status: self.status,
            image: non_blank(&image),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub label: String,
    pub value: String,
    pub description: String,
    pub sort_order: i32,
}

impl CategoryForm {
    pub fn from_category(category: &GalleryCategory) -> Self {
        Self {
            label: category.label.clone(),
            value: category.value.clone(),
            description: category.description.clone().unwrap_or_default(),
            sort_order: category.sort_order,
        }
    }

    /// Numeric text input; anything unparsable counts as 0.
    pub fn set_sort_order_input(&mut self, raw: &str) {
        self.sort_order = raw.trim().parse().unwrap_or(0);
    }

    pub fn to_payload(&self) -> CategoryPayload {
        CategoryPayload {
            label: self.label.trim().to_string(),
            value: non_blank(&self.value),
            description: non_blank(&self.description),
            sort_order: self.sort_order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(GalleryItemId),
}

/// Create/edit form for a single gallery item.
pub struct ItemEditor {
    mutator: AdminMutator,
    mode: EditorMode,
    categories: CategoryStore,
    pub form: ItemForm,
}

impl ItemEditor {
    pub async fn open_create(api: Arc<dyn GalleryApi>) -> Self {
        let categories = CategoryStore::load_or_empty(api.as_ref()).await;
        Self {
            mutator: AdminMutator::new(api),
            mode: EditorMode::Create,
            categories,
            form: ItemForm::default(),
        }
    }

    pub async fn open_edit(api: Arc<dyn GalleryApi>, id: GalleryItemId) -> Result<Self> {
        let (categories, item) = futures::join!(
            CategoryStore::load_or_empty(api.as_ref()),
            api.get_item(id)
        );
        let item = item.map_err(|err| {
            warn!(item_id = id.0, error = %err, "admin: failed to load gallery item");
            err
        })?;
        Ok(Self {
            mutator: AdminMutator::new(api),
            mode: EditorMode::Edit(id),
            categories,
            form: ItemForm::from_item(&item),
        })
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    /// Saves the form. On failure the form is left untouched so the user can
    /// fix it or simply retry.
    pub async fn submit(&mut self) -> Result<GalleryItemId> {
        let id = match self.mode {
            EditorMode::Create => {
                let created = self.mutator.create(&self.form).await?;
                self.mode = EditorMode::Edit(created.id);
                if let Some(image) = created.image_filename() {
                    self.form.image = image.to_string();
                    self.form.image_file = None;
                }
                created.id
            }
            EditorMode::Edit(id) => {
                self.mutator.update(id, &self.form).await?;
                id
            }
        };
        Ok(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    pub card: GalleryCard,
    pub status: GalleryStatus,
    pub status_label: &'static str,
}

/// Admin item table: one capped page of every status, with filters.
pub struct AdminGalleryPage {
    fetcher: ListFetcher,
    mutator: AdminMutator,
    categories: CategoryStore,
    query: QueryState,
    listing: Listing,
    last_error: Option<String>,
}

impl AdminGalleryPage {
    pub async fn mount(api: Arc<dyn GalleryApi>) -> Self {
        Self::mount_with_query(api, QueryState::default()).await
    }

    pub async fn mount_with_query(api: Arc<dyn GalleryApi>, query: QueryState) -> Self {
        let mut page = Self {
            fetcher: ListFetcher::new(Arc::clone(&api), ListScope::Admin),
            mutator: AdminMutator::new(Arc::clone(&api)),
            categories: CategoryStore::default(),
            query,
            listing: Listing::default(),
            last_error: None,
        };
        let (categories, outcome) = futures::join!(
            CategoryStore::load_or_empty(api.as_ref()),
            page.fetcher.fetch(&page.query)
        );
        page.categories = categories;
        page.apply(outcome);
        page
    }

    pub async fn reload(&mut self) {
        let outcome = self.fetcher.fetch(&self.query).await;
        self.apply(outcome);
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Applied { listing, .. } => {
                self.listing = listing;
                self.last_error = None;
            }
            FetchOutcome::Failed { error, .. } => {
                self.last_error = Some(error.user_message(MSG_LOAD_ITEM_FAILED));
            }
            FetchOutcome::Superseded { .. } => {}
        }
    }

    async fn replace_query(&mut self, next: QueryState) {
        if next != self.query {
            self.query = next;
            self.reload().await;
        }
    }

    pub async fn set_search(&mut self, search_term: &str) {
        let next = self.query.clone().with_search(search_term);
        self.replace_query(next).await;
    }

    pub async fn set_category(&mut self, category: &str) {
        let next = self.query.clone().with_category(category);
        self.replace_query(next).await;
    }

    pub async fn set_status(&mut self, status: Option<GalleryStatus>) {
        let next = self.query.clone().with_status(status);
        self.replace_query(next).await;
    }

    pub async fn delete(&mut self, id: GalleryItemId) -> Result<()> {
        self.mutator.delete(id).await?;
        self.reload().await;
        Ok(())
    }

    pub async fn toggle_status(&mut self, id: GalleryItemId) -> Result<()> {
        self.mutator.toggle_status(id, &self.listing.items).await?;
        self.reload().await;
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.fetcher.is_loading()
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.listing.items
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn rows(&self, images: &ImageUrls) -> Vec<AdminRow> {
        self.listing
            .items
            .iter()
            .map(|item| AdminRow {
                card: view::card(item, &self.categories, images),
                status: item.status,
                status_label: view::status_label(item.status),
            })
            .collect()
    }
}

/// Category manager: full category list plus a create/edit form.
pub struct CategoryAdminPage {
    api: Arc<dyn GalleryApi>,
    mutator: AdminMutator,
    categories: Vec<GalleryCategory>,
    editing_id: Option<GalleryCategoryId>,
    last_error: Option<String>,
    pub form: CategoryForm,
}

impl CategoryAdminPage {
    pub async fn mount(api: Arc<dyn GalleryApi>) -> Self {
        let mut page = Self {
            mutator: AdminMutator::new(Arc::clone(&api)),
            api,
            categories: Vec::new(),
            editing_id: None,
            last_error: None,
            form: CategoryForm::default(),
        };
        page.reload().await;
        page
    }

    pub async fn reload(&mut self) {
        match CategoryStore::load_admin(self.api.as_ref()).await {
            Ok(store) => {
                self.categories = store.categories().to_vec();
                self.last_error = None;
            }
            Err(err) => {
                warn!(error = %err, "categories: failed to load admin list");
                self.last_error = Some(MSG_LOAD_CATEGORIES_FAILED.to_string());
            }
        }
    }

    /// Starts editing the category with `id`. Returns false if it is not in
    /// the loaded list.
    pub fn edit(&mut self, id: GalleryCategoryId) -> bool {
        let Some(category) = self
            .categories
            .iter()
            .find(|category| category.id == Some(id))
        else {
            return false;
        };
        self.form = CategoryForm::from_category(category);
        self.editing_id = Some(id);
        true
    }

    pub fn reset_form(&mut self) {
        self.editing_id = None;
        self.form = CategoryForm::default();
    }

    pub async fn submit(&mut self) -> Result<()> {
        match self.editing_id {
            Some(id) => self.mutator.update_category(id, &self.form).await?,
            None => {
                let created = self.mutator.create_category(&self.form).await?;
                info!(value = %created.value, "categories: created from form");
            }
        }
        self.reset_form();
        self.reload().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: GalleryCategoryId) -> Result<()> {
        self.mutator.delete_category(id).await?;
        self.reload().await;
        Ok(())
    }

    pub fn categories(&self) -> &[GalleryCategory] {
        &self.categories
    }

    pub fn editing_id(&self) -> Option<GalleryCategoryId> {
        self.editing_id
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/admin_tests.rs"]
mod tests;
