//! reqwest implementation of [`GalleryApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{GalleryCategoryId, GalleryItemId},
    error::ApiError,
    protocol::{
        CategoryListResponse, CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload,
        ListItemsQuery, ListResponse, UploadResponse,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{error::ClientError, images::ImageUpload, GalleryApi, ListScope, Result};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: &str) -> Result<Self> {
        let api_base_url = Url::parse(api_base_url.trim())
            .map_err(|e| ClientError::InvalidUrl(format!("'{api_base_url}': {e}")))?;
        Ok(Self {
            api_base_url,
            api_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

pub struct HttpGalleryApi {
    http: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpGalleryApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
            api_token: config.api_token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ApiError>(&body)
            .ok()
            .and_then(|error| error.display_message().map(str::to_string));
        warn!(status = status.as_u16(), message = ?message, "api: request rejected");
        Err(ClientError::from_status(status.as_u16(), message))
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.execute(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl GalleryApi for HttpGalleryApi {
    async fn list_categories(&self) -> Result<Vec<GalleryCategory>> {
        self.execute_json(self.http.get(self.url("/gallery/categories")))
            .await
    }

    async fn list_categories_admin(&self) -> Result<Vec<GalleryCategory>> {
        let response: CategoryListResponse = self
            .execute_json(self.http.get(self.url("/gallery/categories/admin/all")))
            .await?;
        Ok(response.data)
    }

    async fn list_items(
        &self,
        scope: ListScope,
        query: &ListItemsQuery,
    ) -> Result<ListResponse<GalleryItem>> {
        let path = match scope {
            ListScope::Public => "/gallery",
            ListScope::Admin => "/gallery/admin/all",
        };
        self.execute_json(self.http.get(self.url(path)).query(query))
            .await
    }

    async fn get_item(&self, id: GalleryItemId) -> Result<GalleryItem> {
        self.execute_json(self.http.get(self.url(&format!("/gallery/{}", id.0))))
            .await
    }

    async fn create_item(&self, payload: &GalleryItemPayload) -> Result<GalleryItem> {
        let item: GalleryItem = self
            .execute_json(self.http.post(self.url("/gallery")).json(payload))
            .await?;
        info!(item_id = item.id.0, "api: gallery item created");
        Ok(item)
    }

    async fn update_item(&self, id: GalleryItemId, payload: &GalleryItemPayload) -> Result<()> {
        self.execute(
            self.http
                .put(self.url(&format!("/gallery/{}", id.0)))
                .json(payload),
        )
        .await?;
        info!(item_id = id.0, status = %payload.status, "api: gallery item updated");
        Ok(())
    }

    async fn delete_item(&self, id: GalleryItemId) -> Result<()> {
        self.execute(self.http.delete(self.url(&format!("/gallery/{}", id.0))))
            .await?;
        info!(item_id = id.0, "api: gallery item deleted");
        Ok(())
    }

    async fn upload_image(
        &self,
        upload: &ImageUpload,
        item_id: Option<GalleryItemId>,
    ) -> Result<UploadResponse> {
        let mime_type = upload.resolved_mime_type();
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.filename.clone())
            .mime_str(&mime_type)?;
        let mut form = multipart::Form::new().part("image", part);
        if let Some(item_id) = item_id {
            form = form.text("gallery_id", item_id.0.to_string());
        }
        debug!(
            filename = %upload.filename,
            size_bytes = upload.bytes.len(),
            %mime_type,
            "api: uploading gallery image"
        );
        self.execute_json(self.http.post(self.url("/gallery/upload")).multipart(form))
            .await
    }

    async fn create_category(&self, payload: &CategoryPayload) -> Result<GalleryCategory> {
        self.execute_json(self.http.post(self.url("/gallery/categories")).json(payload))
            .await
    }

    async fn update_category(&self, id: GalleryCategoryId, payload: &CategoryPayload) -> Result<()> {
        self.execute(
            self.http
                .put(self.url(&format!("/gallery/categories/{}", id.0)))
                .json(payload),
        )
        .await?;
        Ok(())
    }

    async fn delete_category(&self, id: GalleryCategoryId) -> Result<()> {
        self.execute(self.http.delete(self.url(&format!("/gallery/categories/{}", id.0))))
            .await?;
        info!(category_id = id.0, "api: gallery category deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
