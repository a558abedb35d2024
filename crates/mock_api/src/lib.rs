//! In-memory implementation of the gallery REST API.
//!
//! Serves the same routes and error bodies as the production backend so the
//! client can be exercised end to end, in tests or by hand.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;

mod api;
pub mod store;

pub use store::{slugify, Store, StoreError, StoredImage};

/// Multipart framing on top of the largest accepted image.
const MAX_REQUEST_BYTES: usize = store::MAX_IMAGE_BYTES + 1024 * 1024;

pub struct AppState {
    pub store: Mutex<Store>,
}

impl AppState {
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(api::healthz))
        .route("/gallery", get(api::list_public_items).post(api::create_item))
        .route("/gallery/admin/all", get(api::list_admin_items))
        .route("/gallery/upload", post(api::upload_image))
        .route(
            "/gallery/categories",
            get(api::list_public_categories).post(api::create_category),
        )
        .route(
            "/gallery/categories/admin/all",
            get(api::list_admin_categories),
        )
        .route(
            "/gallery/categories/:category_id",
            put(api::update_category).delete(api::delete_category),
        )
        .route(
            "/gallery/:item_id",
            get(api::get_item)
                .put(api::update_item)
                .delete(api::delete_item),
        )
        .route("/uploads/:filename", get(api::download_image))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}

/// Serves `state` on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "mock api listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

/// Binds an ephemeral local port, serves `store` in the background and
/// returns the base URL along with the shared state.
pub async fn spawn_local(store: Store) -> anyhow::Result<(String, Arc<AppState>)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let state = AppState::new(store);
    let served = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(error) = serve(listener, served).await {
            tracing::error!(%error, "mock api stopped");
        }
    });
    Ok((format!("http://{addr}"), state))
}
