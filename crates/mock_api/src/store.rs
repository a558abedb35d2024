//! In-memory gallery records with the same rules the real API enforces:
//! filtering, newest-first pagination, slug derivation and the referential
//! check on category deletion.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::{
    domain::{GalleryCategoryId, GalleryItemId, GalleryStatus, DEFAULT_CATEGORY_VALUE},
    protocol::{
        CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload, ListItemsQuery,
        ListResponse, Pagination,
    },
};
use thiserror::Error;

pub const PUBLIC_DEFAULT_LIMIT: u32 = 12;
pub const ADMIN_DEFAULT_LIMIT: u32 = 50;
pub const MAX_LIMIT: u32 = 100;
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    TooLarge(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct Store {
    items: Vec<GalleryItem>,
    categories: Vec<GalleryCategory>,
    images: HashMap<String, StoredImage>,
    next_item_id: i64,
    next_category_id: i64,
    uploads_issued: u64,
}

/// Lowercase ASCII slug: runs of anything but letters and digits become a
/// single `-`, with no leading or trailing dash.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for ch in label.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn item_not_found() -> StoreError {
    StoreError::NotFound("Item galeri tidak ditemukan".to_string())
}

fn category_not_found() -> StoreError {
    StoreError::NotFound("Kategori tidak ditemukan".to_string())
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handful of records for running the binary by hand.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut store = Self::new();
        let categories = [
            ("Kegiatan Desa", "kegiatan", 1),
            ("Wisata", "wisata", 2),
            ("Pembangunan", "pembangunan", 3),
            ("Seni & Budaya", "budaya", 4),
        ];
        for (label, value, sort_order) in categories {
            let payload = CategoryPayload {
                label: label.to_string(),
                value: Some(value.to_string()),
                description: None,
                sort_order,
            };
            // Seed values are unique, so this cannot conflict.
            let _ = store.create_category(&payload);
        }

        let items = [
            ("Gotong royong bersih desa", "kegiatan", GalleryStatus::Active),
            ("Panen raya padi", "kegiatan", GalleryStatus::Active),
            ("Pantai Ansang saat senja", "wisata", GalleryStatus::Active),
            ("Pengaspalan jalan dusun", "pembangunan", GalleryStatus::Active),
            ("Tari tradisional", "budaya", GalleryStatus::Active),
            ("Arsip lama balai desa", "kegiatan", GalleryStatus::Inactive),
        ];
        for (offset, (title, category, status)) in items.into_iter().enumerate() {
            let payload = GalleryItemPayload {
                title: title.to_string(),
                description: Some(format!("Dokumentasi {}", title.to_lowercase())),
                category: category.to_string(),
                status,
                image: Some(format!("seed-{}.jpg", offset + 1)),
            };
            let created_at = now - chrono::Duration::days(offset as i64);
            let _ = store.create_item(&payload, created_at);
        }
        store
    }

    fn matches(item: &GalleryItem, query: &ListItemsQuery, public: bool) -> bool {
        if public && item.status != GalleryStatus::Active {
            return false;
        }
        if !public {
            if let Some(status) = non_blank(query.status.as_deref()) {
                if !item.status.as_str().eq_ignore_ascii_case(&status) {
                    return false;
                }
            }
        }
        if let Some(category) = non_blank(query.category.as_deref()) {
            if item.category != category {
                return false;
            }
        }
        if let Some(search) = non_blank(query.search.as_deref()) {
            let search = search.to_lowercase();
            let in_title = item.title.to_lowercase().contains(&search);
            let in_description = item
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(&search));
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }

    /// Newest first. `public` restricts to active items and ignores the
    /// status filter.
    pub fn list_items(&self, query: &ListItemsQuery, public: bool) -> ListResponse<GalleryItem> {
        let default_limit = if public {
            PUBLIC_DEFAULT_LIMIT
        } else {
            ADMIN_DEFAULT_LIMIT
        };
        let limit = query.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        let page = query.page.unwrap_or(1).max(1);

        let mut matching: Vec<&GalleryItem> = self
            .items
            .iter()
            .filter(|item| Self::matches(item, query, public))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));

        let total = matching.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let data = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        ListResponse {
            data,
            pagination: Some(Pagination {
                page,
                total_pages,
                total,
            }),
        }
    }

    pub fn get_item(&self, id: GalleryItemId) -> StoreResult<GalleryItem> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(item_not_found)
    }

    fn validate_item(payload: &GalleryItemPayload) -> StoreResult<()> {
        if payload.title.trim().is_empty() {
            return Err(StoreError::Validation("Judul harus diisi".to_string()));
        }
        Ok(())
    }

    fn category_or_default(category: &str) -> String {
        non_blank(Some(category)).unwrap_or_else(|| DEFAULT_CATEGORY_VALUE.to_string())
    }

    pub fn create_item(
        &mut self,
        payload: &GalleryItemPayload,
        now: DateTime<Utc>,
    ) -> StoreResult<GalleryItem> {
        Self::validate_item(payload)?;
        self.next_item_id += 1;
        let item = GalleryItem {
            id: GalleryItemId(self.next_item_id),
            title: payload.title.trim().to_string(),
            description: non_blank(payload.description.as_deref()),
            category: Self::category_or_default(&payload.category),
            status: payload.status,
            image: non_blank(payload.image.as_deref()),
            created_at: Some(now),
        };
        self.items.push(item.clone());
        Ok(item)
    }

    pub fn update_item(
        &mut self,
        id: GalleryItemId,
        payload: &GalleryItemPayload,
    ) -> StoreResult<GalleryItem> {
        Self::validate_item(payload)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(item_not_found)?;
        item.title = payload.title.trim().to_string();
        item.description = non_blank(payload.description.as_deref());
        item.category = Self::category_or_default(&payload.category);
        item.status = payload.status;
        item.image = non_blank(payload.image.as_deref());
        Ok(item.clone())
    }

    /// Removes the record and the uploaded image it referenced.
    pub fn delete_item(&mut self, id: GalleryItemId) -> StoreResult<GalleryItem> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(item_not_found)?;
        let removed = self.items.remove(index);
        if let Some(image) = removed.image_filename() {
            self.images.remove(image);
        }
        Ok(removed)
    }

    /// Stores an uploaded image under a fresh name and returns that name.
    /// `gallery_id`, when given, must refer to an existing item.
    pub fn store_image(
        &mut self,
        original_name: Option<&str>,
        content_type: &str,
        bytes: Vec<u8>,
        gallery_id: Option<GalleryItemId>,
        now: DateTime<Utc>,
    ) -> StoreResult<String> {
        if bytes.is_empty() {
            return Err(StoreError::Validation("Gambar harus dipilih".to_string()));
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(StoreError::TooLarge(
                "Ukuran gambar maksimal 20MB".to_string(),
            ));
        }
        if !content_type.starts_with("image/") {
            return Err(StoreError::Validation(
                "File harus berupa gambar".to_string(),
            ));
        }
        if let Some(id) = gallery_id {
            self.get_item(id)?;
        }

        self.uploads_issued += 1;
        let extension = original_name
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|ch| ch.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "jpg".to_string());
        let filename = format!(
            "gallery-{}-{}.{extension}",
            now.timestamp_millis(),
            self.uploads_issued
        );
        self.images.insert(
            filename.clone(),
            StoredImage {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(filename)
    }

    pub fn image(&self, filename: &str) -> Option<&StoredImage> {
        self.images.get(filename)
    }

    fn sorted_categories(&self) -> Vec<GalleryCategory> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.label.cmp(&b.label))
        });
        categories
    }

    /// Public listing: only `value` and `label`.
    pub fn public_categories(&self) -> Vec<GalleryCategory> {
        self.sorted_categories()
            .into_iter()
            .map(|category| GalleryCategory {
                id: None,
                value: category.value,
                label: category.label,
                description: None,
                sort_order: category.sort_order,
            })
            .collect()
    }

    pub fn admin_categories(&self) -> Vec<GalleryCategory> {
        self.sorted_categories()
    }

    fn references(&self, value: &str) -> usize {
        self.items.iter().filter(|item| item.category == value).count()
    }

    fn category_label(payload: &CategoryPayload) -> StoreResult<String> {
        non_blank(Some(&payload.label)).ok_or_else(|| {
            StoreError::Validation("Nama kategori (label) harus diisi".to_string())
        })
    }

    /// Slug for `payload`: the given value normalized, or `fallback` when
    /// the value is blank. Fails when another category already owns it.
    fn category_value(
        &self,
        payload: &CategoryPayload,
        fallback: String,
        editing: Option<GalleryCategoryId>,
    ) -> StoreResult<String> {
        let value = non_blank(payload.value.as_deref())
            .map(|value| slugify(&value))
            .unwrap_or(fallback);
        if value.is_empty() {
            return Err(StoreError::Validation(
                "Value kategori tidak valid".to_string(),
            ));
        }
        let taken = self
            .categories
            .iter()
            .any(|category| category.value == value && category.id != editing);
        if taken {
            return Err(StoreError::Conflict(format!(
                "Kategori dengan value '{value}' sudah ada"
            )));
        }
        Ok(value)
    }

    pub fn create_category(&mut self, payload: &CategoryPayload) -> StoreResult<GalleryCategory> {
        let label = Self::category_label(payload)?;
        let value = self.category_value(payload, slugify(&label), None)?;
        self.next_category_id += 1;
        let category = GalleryCategory {
            id: Some(GalleryCategoryId(self.next_category_id)),
            value,
            label,
            description: non_blank(payload.description.as_deref()),
            sort_order: payload.sort_order,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// A blank value keeps the current one. Changing the value of a category
    /// that items still use is refused, since items reference it by value.
    pub fn update_category(
        &mut self,
        id: GalleryCategoryId,
        payload: &CategoryPayload,
    ) -> StoreResult<GalleryCategory> {
        let current_value = self
            .categories
            .iter()
            .find(|category| category.id == Some(id))
            .map(|category| category.value.clone())
            .ok_or_else(category_not_found)?;
        let label = Self::category_label(payload)?;
        let value = self.category_value(payload, current_value.clone(), Some(id))?;
        if value != current_value {
            let used = self.references(&current_value);
            if used > 0 {
                return Err(StoreError::Conflict(format!(
                    "Kategori masih digunakan oleh {used} item galeri"
                )));
            }
        }

        let category = self
            .categories
            .iter_mut()
            .find(|category| category.id == Some(id))
            .ok_or_else(category_not_found)?;
        category.label = label;
        category.value = value;
        category.description = non_blank(payload.description.as_deref());
        category.sort_order = payload.sort_order;
        Ok(category.clone())
    }

    pub fn delete_category(&mut self, id: GalleryCategoryId) -> StoreResult<()> {
        let index = self
            .categories
            .iter()
            .position(|category| category.id == Some(id))
            .ok_or_else(category_not_found)?;
        let used = self.references(&self.categories[index].value);
        if used > 0 {
            return Err(StoreError::Conflict(format!(
                "Kategori masih digunakan oleh {used} item galeri"
            )));
        }
        self.categories.remove(index);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
