use std::sync::Arc;

use shared::{
    domain::{GalleryCategoryId, GalleryItemId},
    protocol::{GalleryCategory, GalleryItem, GalleryItemPayload},
};
use tracing::info;

use crate::{
    admin::{CategoryForm, ItemForm},
    error::{ClientError, ValidationError},
    GalleryApi, Result,
};

/// Back-office writes. Each call is a single request sequence with no
/// local caching; callers reload their list after a successful write.
#[derive(Clone)]
pub struct AdminMutator {
    api: Arc<dyn GalleryApi>,
}

impl AdminMutator {
    pub fn new(api: Arc<dyn GalleryApi>) -> Self {
        Self { api }
    }

    pub async fn create(&self, form: &ItemForm) -> Result<GalleryItem> {
        validate_item_form(form)?;
        let image = self.resolve_image(form, None).await?;
        let item = self.api.create_item(&form.to_payload(image)).await?;
        info!(item_id = item.id.0, title = %item.title, "admin: gallery item created");
        Ok(item)
    }

    pub async fn update(&self, id: GalleryItemId, form: &ItemForm) -> Result<()> {
        validate_item_form(form)?;
        let image = self.resolve_image(form, Some(id)).await?;
        self.api.update_item(id, &form.to_payload(image)).await?;
        info!(item_id = id.0, "admin: gallery item updated");
        Ok(())
    }

    pub async fn delete(&self, id: GalleryItemId) -> Result<()> {
        self.api.delete_item(id).await?;
        info!(item_id = id.0, "admin: gallery item deleted");
        Ok(())
    }

    /// Flips the status of an item using the copy from `loaded`, not a fresh
    /// read. Other fields are sent back exactly as loaded, so a concurrent
    /// server-side edit to them is overwritten.
    pub async fn toggle_status(&self, id: GalleryItemId, loaded: &[GalleryItem]) -> Result<()> {
        let item = loaded
            .iter()
            .find(|item| item.id == id)
            .ok_or(ClientError::NotLoaded { id })?;
        let mut payload = GalleryItemPayload::from(item);
        payload.status = item.status.toggled();
        self.api.update_item(id, &payload).await?;
        info!(item_id = id.0, status = %payload.status, "admin: gallery item status toggled");
        Ok(())
    }

    pub async fn create_category(&self, form: &CategoryForm) -> Result<GalleryCategory> {
        validate_category_form(form)?;
        let category = self.api.create_category(&form.to_payload()).await?;
        info!(value = %category.value, "admin: gallery category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: GalleryCategoryId, form: &CategoryForm) -> Result<()> {
        validate_category_form(form)?;
        self.api.update_category(id, &form.to_payload()).await?;
        info!(category_id = id.0, "admin: gallery category updated");
        Ok(())
    }

    /// The server rejects deleting a category that items still reference;
    /// that comes back as [`ClientError::Conflict`].
    pub async fn delete_category(&self, id: GalleryCategoryId) -> Result<()> {
        self.api.delete_category(id).await?;
        info!(category_id = id.0, "admin: gallery category deleted");
        Ok(())
    }

    /// Uploads the newly selected file, if any, and returns the filename the
    /// item should reference. Nothing is written when the upload fails.
    async fn resolve_image(&self, form: &ItemForm, item_id: Option<GalleryItemId>) -> Result<String> {
        let Some(upload) = &form.image_file else {
            return Ok(form.image.clone());
        };
        let response = self
            .api
            .upload_image(upload, item_id)
            .await
            .map_err(ClientError::upload)?;
        info!(filename = %response.filename, "admin: gallery image uploaded");
        Ok(response.filename)
    }
}

fn validate_item_form(form: &ItemForm) -> Result<(), ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    match &form.image_file {
        Some(upload) => upload.validate(),
        None if form.image.trim().is_empty() => Err(ValidationError::MissingImage),
        None => Ok(()),
    }
}

fn validate_category_form(form: &CategoryForm) -> Result<(), ValidationError> {
    if form.label.trim().is_empty() {
        return Err(ValidationError::MissingLabel);
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/mutator_tests.rs"]
mod tests;
