//! In-process [`GalleryApi`] used by the unit tests. It keeps items and
//! categories in memory, counts every call and can be told to fail or to
//! hold a listing request until a gate is opened.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use shared::{
    domain::{GalleryCategoryId, GalleryItemId, GalleryStatus},
    protocol::{
        CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload, ListItemsQuery,
        ListResponse, Pagination, UploadResponse,
    },
};
use tokio::sync::Notify;

use crate::{error::ClientError, images::ImageUpload, GalleryApi, ListScope, Result};

pub fn item(id: i64, title: &str, category: &str, status: GalleryStatus) -> GalleryItem {
    GalleryItem {
        id: GalleryItemId(id),
        title: title.to_string(),
        description: Some(format!("Deskripsi {title}")),
        category: category.to_string(),
        status,
        image: Some(format!("foto-{id}.jpg")),
        created_at: Utc.with_ymd_and_hms(2024, 3, id as u32 % 28 + 1, 8, 0, 0).single(),
    }
}

pub fn category(id: i64, value: &str, label: &str) -> GalleryCategory {
    GalleryCategory {
        id: Some(GalleryCategoryId(id)),
        value: value.to_string(),
        label: label.to_string(),
        description: None,
        sort_order: 0,
    }
}

#[derive(Default)]
pub struct FakeGalleryApi {
    items: Mutex<Vec<GalleryItem>>,
    categories: Mutex<Vec<GalleryCategory>>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
    list_gates: Mutex<VecDeque<Arc<Notify>>>,
    list_requests: Mutex<Vec<(ListScope, ListItemsQuery)>>,
    updates: Mutex<Vec<(GalleryItemId, GalleryItemPayload)>>,
    created: Mutex<Vec<GalleryItemPayload>>,
    uploads: Mutex<Vec<(String, Option<GalleryItemId>)>>,
}

impl FakeGalleryApi {
    pub fn new(items: Vec<GalleryItem>, categories: Vec<GalleryCategory>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(items),
            categories: Mutex::new(categories),
            ..Self::default()
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new(), Vec::new())
    }

    /// Makes every later call to `op` fail with `status`.
    pub fn fail(&self, op: &'static str, status: u16, message: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, (status, message.map(str::to_string)));
    }

    pub fn clear_failure(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    /// The next `list_items` call waits until the returned gate is notified.
    pub fn gate_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.list_gates.lock().unwrap().push_back(Arc::clone(&gate));
        gate
    }

    pub fn set_item(&self, replacement: GalleryItem) {
        let mut items = self.items.lock().unwrap();
        if let Some(existing) = items.iter_mut().find(|item| item.id == replacement.id) {
            *existing = replacement;
        }
    }

    pub fn stored_items(&self) -> Vec<GalleryItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn stored_categories(&self) -> Vec<GalleryCategory> {
        self.categories.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| **call == op).count()
    }

    pub fn list_requests(&self) -> Vec<(ListScope, ListItemsQuery)> {
        self.list_requests.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(GalleryItemId, GalleryItemPayload)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<GalleryItemPayload> {
        self.created.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, Option<GalleryItemId>)> {
        self.uploads.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(op) {
            Some((status, message)) => Err(ClientError::from_status(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn not_found() -> ClientError {
        ClientError::from_status(404, Some("Item galeri tidak ditemukan".to_string()))
    }
}

fn matches(item: &GalleryItem, scope: ListScope, query: &ListItemsQuery) -> bool {
    if scope == ListScope::Public && item.status != GalleryStatus::Active {
        return false;
    }
    if let Some(status) = &query.status {
        if item.status.as_str() != status {
            return false;
        }
    }
    if let Some(category) = &query.category {
        if &item.category != category {
            return false;
        }
    }
    if let Some(search) = &query.search {
        let search = search.to_lowercase();
        let description = item.description.clone().unwrap_or_default().to_lowercase();
        if !item.title.to_lowercase().contains(&search) && !description.contains(&search) {
            return false;
        }
    }
    true
}

#[async_trait]
impl GalleryApi for FakeGalleryApi {
    async fn list_categories(&self) -> Result<Vec<GalleryCategory>> {
        self.record("list_categories")?;
        Ok(self.stored_categories())
    }

    async fn list_categories_admin(&self) -> Result<Vec<GalleryCategory>> {
        self.record("list_categories_admin")?;
        Ok(self.stored_categories())
    }

    async fn list_items(
        &self,
        scope: ListScope,
        query: &ListItemsQuery,
    ) -> Result<ListResponse<GalleryItem>> {
        self.list_requests
            .lock()
            .unwrap()
            .push((scope, query.clone()));
        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.record("list_items")?;

        let matching: Vec<_> = self
            .stored_items()
            .into_iter()
            .filter(|item| matches(item, scope, query))
            .collect();
        let limit = query.limit.unwrap_or(scope.page_size()).max(1) as usize;
        let page = query.page.unwrap_or(1).max(1);
        let total = matching.len();
        let data = matching
            .into_iter()
            .skip((page as usize - 1) * limit)
            .take(limit)
            .collect();
        Ok(ListResponse {
            data,
            pagination: Some(Pagination {
                page,
                total_pages: total.div_ceil(limit) as u32,
                total: total as u64,
            }),
        })
    }

    async fn get_item(&self, id: GalleryItemId) -> Result<GalleryItem> {
        self.record("get_item")?;
        self.stored_items()
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(Self::not_found)
    }

    async fn create_item(&self, payload: &GalleryItemPayload) -> Result<GalleryItem> {
        self.record("create_item")?;
        self.created.lock().unwrap().push(payload.clone());
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|item| item.id.0).max().unwrap_or(0) + 1;
        let item = GalleryItem {
            id: GalleryItemId(id),
            title: payload.title.clone(),
            description: payload.description.clone(),
            category: payload.category.clone(),
            status: payload.status,
            image: payload.image.clone(),
            created_at: Some(Utc::now()),
        };
        items.push(item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: GalleryItemId, payload: &GalleryItemPayload) -> Result<()> {
        self.record("update_item")?;
        self.updates.lock().unwrap().push((id, payload.clone()));
        let mut items = self.items.lock().unwrap();
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(Self::not_found)?;
        item.title = payload.title.clone();
        item.description = payload.description.clone();
        item.category = payload.category.clone();
        item.status = payload.status;
        item.image = payload.image.clone();
        Ok(())
    }

    async fn delete_item(&self, id: GalleryItemId) -> Result<()> {
        self.record("delete_item")?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }

    async fn upload_image(
        &self,
        upload: &ImageUpload,
        item_id: Option<GalleryItemId>,
    ) -> Result<UploadResponse> {
        self.record("upload_image")?;
        self.uploads
            .lock()
            .unwrap()
            .push((upload.filename.clone(), item_id));
        Ok(UploadResponse {
            filename: format!("gallery-1700000000000-{}", upload.filename),
        })
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<GalleryCategory> {
        self.record("create_category")?;
        let mut categories = self.categories.lock().unwrap();
        let id = categories
            .iter()
            .filter_map(|category| category.id.map(|id| id.0))
            .max()
            .unwrap_or(0)
            + 1;
        let category = GalleryCategory {
            id: Some(GalleryCategoryId(id)),
            value: payload
                .value
                .clone()
                .unwrap_or_else(|| payload.label.to_lowercase().replace(' ', "-")),
            label: payload.label.clone(),
            description: payload.description.clone(),
            sort_order: payload.sort_order,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: GalleryCategoryId, payload: &CategoryPayload) -> Result<()> {
        self.record("update_category")?;
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|category| category.id == Some(id))
            .ok_or_else(Self::not_found)?;
        category.label = payload.label.clone();
        if let Some(value) = &payload.value {
            category.value = value.clone();
        }
        category.description = payload.description.clone();
        category.sort_order = payload.sort_order;
        Ok(())
    }

    async fn delete_category(&self, id: GalleryCategoryId) -> Result<()> {
        self.record("delete_category")?;
        self.categories
            .lock()
            .unwrap()
            .retain(|category| category.id != Some(id));
        Ok(())
    }
}
