use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use shared::{
    domain::{GalleryCategoryId, GalleryItemId},
    error::{ApiError, ErrorCode},
    protocol::{
        CategoryListResponse, CategoryPayload, GalleryCategory, GalleryItem, GalleryItemPayload,
        ListItemsQuery, ListResponse, MessageResponse, UploadResponse,
    },
};
use tracing::{info, warn};

use crate::{store::StoreError, AppState};

type ApiRejection = (StatusCode, Json<ApiError>);
type ApiResult<T> = Result<Json<T>, ApiRejection>;

fn reject(error: StoreError) -> ApiRejection {
    let (status, code) = match &error {
        StoreError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        StoreError::Validation(_) => (StatusCode::BAD_REQUEST, ErrorCode::Validation),
        StoreError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Conflict),
        StoreError::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, ErrorCode::PayloadTooLarge),
    };
    warn!(status = status.as_u16(), %error, "gallery: request rejected");
    (status, Json(ApiError::new(code, error.to_string())))
}

fn reject_multipart(error: MultipartError) -> ApiRejection {
    let status = error.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorCode::PayloadTooLarge
    } else {
        ErrorCode::Validation
    };
    warn!(status = status.as_u16(), %error, "gallery: malformed upload");
    (status, Json(ApiError::new(code, error.body_text())))
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: Some(text.to_string()),
    })
}

pub(crate) async fn healthz() -> &'static str {
    "ok"
}

pub(crate) async fn list_public_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> ApiResult<ListResponse<GalleryItem>> {
    let store = state.store.lock().await;
    Ok(Json(store.list_items(&query, true)))
}

pub(crate) async fn list_admin_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListItemsQuery>,
) -> ApiResult<ListResponse<GalleryItem>> {
    let store = state.store.lock().await;
    Ok(Json(store.list_items(&query, false)))
}

pub(crate) async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> ApiResult<GalleryItem> {
    let store = state.store.lock().await;
    store.get_item(GalleryItemId(item_id)).map(Json).map_err(reject)
}

pub(crate) async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GalleryItemPayload>,
) -> Result<(StatusCode, Json<GalleryItem>), ApiRejection> {
    let mut store = state.store.lock().await;
    let item = store.create_item(&payload, Utc::now()).map_err(reject)?;
    info!(item_id = item.id.0, title = %item.title, "gallery: item created");
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(payload): Json<GalleryItemPayload>,
) -> ApiResult<GalleryItem> {
    let mut store = state.store.lock().await;
    let item = store
        .update_item(GalleryItemId(item_id), &payload)
        .map_err(reject)?;
    info!(item_id, status = %item.status, "gallery: item updated");
    Ok(Json(item))
}

pub(crate) async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> ApiResult<MessageResponse> {
    let mut store = state.store.lock().await;
    store.delete_item(GalleryItemId(item_id)).map_err(reject)?;
    info!(item_id, "gallery: item deleted");
    Ok(message("Item galeri berhasil dihapus"))
}

struct ImagePart {
    filename: Option<String>,
    content_type: String,
    bytes: Vec<u8>,
}

pub(crate) async fn upload_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<UploadResponse> {
    let mut image = None;
    let mut gallery_id = None;
    while let Some(field) = multipart.next_field().await.map_err(reject_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(reject_multipart)?;
                image = Some(ImagePart {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("gallery_id") => {
                let raw = field.text().await.map_err(reject_multipart)?;
                let raw = raw.trim();
                if !raw.is_empty() {
                    let id = raw.parse::<i64>().map_err(|_| {
                        reject(StoreError::Validation("gallery_id tidak valid".to_string()))
                    })?;
                    gallery_id = Some(GalleryItemId(id));
                }
            }
            _ => {}
        }
    }

    let Some(image) = image else {
        return Err(reject(StoreError::Validation(
            "Gambar harus dipilih".to_string(),
        )));
    };
    let size_bytes = image.bytes.len();
    let mut store = state.store.lock().await;
    let filename = store
        .store_image(
            image.filename.as_deref(),
            &image.content_type,
            image.bytes,
            gallery_id,
            Utc::now(),
        )
        .map_err(reject)?;
    info!(%filename, size_bytes, gallery_id = ?gallery_id.map(|id| id.0), "gallery: image uploaded");
    Ok(Json(UploadResponse { filename }))
}

pub(crate) async fn download_image(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiRejection> {
    let store = state.store.lock().await;
    let image = store.image(&filename).cloned().ok_or_else(|| {
        reject(StoreError::NotFound("Gambar tidak ditemukan".to_string()))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&image.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    Ok((StatusCode::OK, headers, image.bytes))
}

pub(crate) async fn list_public_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<GalleryCategory>> {
    let store = state.store.lock().await;
    Ok(Json(store.public_categories()))
}

pub(crate) async fn list_admin_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<CategoryListResponse> {
    let store = state.store.lock().await;
    Ok(Json(CategoryListResponse {
        data: store.admin_categories(),
    }))
}

pub(crate) async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CategoryPayload>,
) -> Result<(StatusCode, Json<GalleryCategory>), ApiRejection> {
    let mut store = state.store.lock().await;
    let category = store.create_category(&payload).map_err(reject)?;
    info!(value = %category.value, label = %category.label, "gallery: category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub(crate) async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
    Json(payload): Json<CategoryPayload>,
) -> ApiResult<GalleryCategory> {
    let mut store = state.store.lock().await;
    let category = store
        .update_category(GalleryCategoryId(category_id), &payload)
        .map_err(reject)?;
    info!(category_id, value = %category.value, "gallery: category updated");
    Ok(Json(category))
}

pub(crate) async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<i64>,
) -> ApiResult<MessageResponse> {
    let mut store = state.store.lock().await;
    store
        .delete_category(GalleryCategoryId(category_id))
        .map_err(reject)?;
    info!(category_id, "gallery: category deleted");
    Ok(message("Kategori berhasil dihapus"))
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
