use std::{mem, sync::Arc};

use shared::domain::GalleryItemId;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::{
    category_store::CategoryStore,
    error::MSG_LOAD_ITEM_FAILED,
    fetcher::{FetchOutcome, ListFetcher},
    images::ImageUrls,
    query::QueryState,
    view::{self, GalleryCard, GalleryView, Pager},
    GalleryApi, ListScope,
};

/// Public gallery page: filters, pagination and the lightbox.
///
/// Fetches run as spawned tasks. Dispatching a new query aborts the one in
/// flight, and dropping the page aborts whatever is still running.
pub struct GalleryPage {
    api: Arc<dyn GalleryApi>,
    fetcher: Arc<ListFetcher>,
    categories: CategoryStore,
    query: QueryState,
    view: GalleryView,
    inflight: Option<JoinHandle<FetchOutcome>>,
}

impl GalleryPage {
    pub fn new(api: Arc<dyn GalleryApi>) -> Self {
        Self {
            fetcher: Arc::new(ListFetcher::new(Arc::clone(&api), ListScope::Public)),
            api,
            categories: CategoryStore::default(),
            query: QueryState::default(),
            view: GalleryView::default(),
            inflight: None,
        }
    }

    /// Loads categories and the first page concurrently.
    pub async fn mount(api: Arc<dyn GalleryApi>) -> Self {
        Self::mount_with_query(api, QueryState::default()).await
    }

    /// Like [`GalleryPage::mount`], starting from an existing query (a deep
    /// link or command-line filters).
    pub async fn mount_with_query(api: Arc<dyn GalleryApi>, query: QueryState) -> Self {
        let mut page = Self::new(api);
        page.query = query;
        page.dispatch();
        page.categories = CategoryStore::load_or_empty(page.api.as_ref()).await;
        page.settle().await;
        page.clamp_to_last_page().await;
        page
    }

    /// Starts a fetch for the current query, cancelling any earlier one.
    pub fn dispatch(&mut self) {
        if let Some(previous) = self.inflight.take() {
            previous.abort();
        }
        let fetcher = Arc::clone(&self.fetcher);
        let query = self.query.clone();
        self.view = mem::take(&mut self.view).begin_loading();
        self.inflight = Some(tokio::spawn(async move { fetcher.fetch(&query).await }));
    }

    /// Waits for the in-flight fetch, if any, and applies its outcome.
    pub async fn settle(&mut self) {
        let Some(handle) = self.inflight.take() else {
            return;
        };
        match handle.await {
            Ok(outcome) => self.apply(outcome),
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                error!(error = %err, "gallery: fetch task panicked");
                self.view = mem::take(&mut self.view).load_failed(MSG_LOAD_ITEM_FAILED);
            }
        }
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        let view = mem::take(&mut self.view);
        self.view = match outcome {
            FetchOutcome::Applied { listing, .. } => view.loaded(listing),
            FetchOutcome::Failed { error, .. } => {
                view.load_failed(error.user_message(MSG_LOAD_ITEM_FAILED))
            }
            FetchOutcome::Superseded { .. } => view,
        };
    }

    async fn replace_query(&mut self, next: QueryState) {
        if next == self.query {
            return;
        }
        self.query = next;
        self.dispatch();
        self.settle().await;
        self.clamp_to_last_page().await;
    }

    /// A page past the end (an old link, or items deleted meanwhile) comes
    /// back empty. Refetch the last page rather than show an empty gallery.
    async fn clamp_to_last_page(&mut self) {
        let pagination = self.view.pagination();
        let past_end = self.view.listing().is_some()
            && self.view.items().is_empty()
            && pagination.total > 0
            && pagination.total_pages >= 1
            && self.query.page > pagination.total_pages;
        if !past_end {
            return;
        }
        debug!(
            requested = self.query.page,
            last = pagination.total_pages,
            "gallery: page out of range, loading last page"
        );
        self.query = self.query.clone().with_page(pagination.total_pages);
        self.dispatch();
        self.settle().await;
    }

    pub async fn set_search(&mut self, search_term: &str) {
        let next = self.query.clone().with_search(search_term);
        self.replace_query(next).await;
    }

    pub async fn set_category(&mut self, category: &str) {
        let next = self.query.clone().with_category(category);
        self.replace_query(next).await;
    }

    /// Moves to `page`. Pages outside `1..=total_pages` are ignored (the
    /// matching buttons are disabled) and return false.
    pub async fn change_page(&mut self, page: u32) -> bool {
        if !self.view.pagination().contains_page(page) {
            return false;
        }
        self.query = self.query.clone().with_page(page);
        self.dispatch();
        self.settle().await;
        self.clamp_to_last_page().await;
        true
    }

    pub fn open_detail(&mut self, id: GalleryItemId) -> bool {
        self.view = mem::take(&mut self.view).open_detail(id);
        self.view.selected().is_some()
    }

    pub fn close_detail(&mut self) {
        self.view = mem::take(&mut self.view).close_detail();
    }

    pub fn cards(&self, images: &ImageUrls) -> Vec<GalleryCard> {
        view::cards(self.view.items(), &self.categories, images)
    }

    pub fn selected_card(&self, images: &ImageUrls) -> Option<GalleryCard> {
        self.view
            .selected()
            .map(|item| view::card(item, &self.categories, images))
    }

    pub fn pager(&self) -> Option<Pager> {
        view::pager(&self.view.pagination())
    }

    pub fn view(&self) -> &GalleryView {
        &self.view
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }
}

impl Drop for GalleryPage {
    fn drop(&mut self) {
        if let Some(inflight) = self.inflight.take() {
            inflight.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
