use async_trait::async_trait;
use shared::{
    domain::{GalleryCategoryId, GalleryItemId},
    protocol::{
        CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload, ListItemsQuery,
        ListResponse, UploadResponse,
    },
};

pub mod admin;
pub mod category_store;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod images;
pub mod mutator;
pub mod page;
pub mod query;
pub mod view;

pub use admin::{
    AdminGalleryPage, AdminRow, CategoryAdminPage, CategoryForm, EditorMode, ItemEditor, ItemForm,
};
pub use category_store::CategoryStore;
pub use error::{ClientError, ValidationError};
pub use fetcher::{FetchOutcome, ListFetcher, Listing};
pub use http::{ClientConfig, HttpGalleryApi};
pub use images::{ImageUpload, ImageUrls, MAX_IMAGE_BYTES};
pub use mutator::AdminMutator;
pub use page::GalleryPage;
pub use query::QueryState;
pub use view::{GalleryCard, GalleryView, Pager, ViewState};

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Which item listing a fetch goes to. The public listing only returns
/// active items and paginates; the admin listing includes every status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Public,
    Admin,
}

impl ListScope {
    pub const PUBLIC_PAGE_SIZE: u32 = 12;
    pub const ADMIN_PAGE_SIZE: u32 = 50;

    pub fn page_size(self) -> u32 {
        match self {
            Self::Public => Self::PUBLIC_PAGE_SIZE,
            Self::Admin => Self::ADMIN_PAGE_SIZE,
        }
    }
}

/// Remote gallery API. Everything the client knows about the server goes
/// through this trait so pages can run against HTTP or an in-process fake.
#[async_trait]
pub trait GalleryApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<GalleryCategory>>;
    async fn list_categories_admin(&self) -> Result<Vec<GalleryCategory>>;
    async fn list_items(
        &self,
        scope: ListScope,
        query: &ListItemsQuery,
    ) -> Result<ListResponse<GalleryItem>>;
    async fn get_item(&self, id: GalleryItemId) -> Result<GalleryItem>;
    async fn create_item(&self, payload: &GalleryItemPayload) -> Result<GalleryItem>;
    async fn update_item(&self, id: GalleryItemId, payload: &GalleryItemPayload) -> Result<()>;
    async fn delete_item(&self, id: GalleryItemId) -> Result<()>;
    async fn upload_image(
        &self,
        upload: &ImageUpload,
        item_id: Option<GalleryItemId>,
    ) -> Result<UploadResponse>;
    async fn create_category(&self, payload: &CategoryPayload) -> Result<GalleryCategory>;
    async fn update_category(&self, id: GalleryCategoryId, payload: &CategoryPayload) -> Result<()>;
    async fn delete_category(&self, id: GalleryCategoryId) -> Result<()>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
