//! Gallery view state and the pure selectors that turn it into cards.

use chrono::{DateTime, Utc};
use shared::{
    domain::{GalleryItemId, GalleryStatus},
    protocol::{GalleryItem, Pagination},
};

use crate::{category_store::CategoryStore, fetcher::Listing, images::ImageUrls};

pub const EMPTY_GALLERY_TITLE: &str = "Belum Ada Foto";
pub const EMPTY_GALLERY_MESSAGE: &str = "Galeri foto masih kosong. Segera akan hadir dengan koleksi foto dan dokumentasi kegiatan menarik di Desa Ansang.";
pub const EMPTY_ADMIN_LIST_MESSAGE: &str = "Tidak ada item galeri ditemukan";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// A fetch is in flight. The previous listing, if any, stays available.
    Loading { previous: Option<Listing> },
    Ready(Listing),
    DetailOpen { listing: Listing, selected: GalleryItem },
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Loading { previous: None }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryView {
    state: ViewState,
    last_error: Option<String>,
}

impl GalleryView {
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn begin_loading(self) -> Self {
        let previous = match self.state {
            ViewState::Loading { previous } => previous,
            ViewState::Ready(listing) | ViewState::DetailOpen { listing, .. } => Some(listing),
        };
        Self {
            state: ViewState::Loading { previous },
            ..self
        }
    }

    pub fn loaded(self, listing: Listing) -> Self {
        Self {
            state: ViewState::Ready(listing),
            last_error: None,
        }
    }

    /// A failed fetch keeps the last known listing (empty on first load).
    pub fn load_failed(self, message: impl Into<String>) -> Self {
        let listing = match self.state {
            ViewState::Loading { previous } => previous.unwrap_or_default(),
            ViewState::Ready(listing) | ViewState::DetailOpen { listing, .. } => listing,
        };
        Self {
            state: ViewState::Ready(listing),
            last_error: Some(message.into()),
        }
    }

    /// Opens the lightbox for an item of the current listing. Ignored while
    /// loading or when the id is not on the page.
    pub fn open_detail(self, id: GalleryItemId) -> Self {
        match self.state {
            ViewState::Ready(listing) => {
                let selected = listing.items.iter().find(|item| item.id == id).cloned();
                let state = match selected {
                    Some(selected) => ViewState::DetailOpen { listing, selected },
                    None => ViewState::Ready(listing),
                };
                Self { state, ..self }
            }
            state => Self { state, ..self },
        }
    }

    pub fn close_detail(self) -> Self {
        match self.state {
            ViewState::DetailOpen { listing, .. } => Self {
                state: ViewState::Ready(listing),
                ..self
            },
            state => Self { state, ..self },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading { .. })
    }

    pub fn listing(&self) -> Option<&Listing> {
        match &self.state {
            ViewState::Loading { previous } => previous.as_ref(),
            ViewState::Ready(listing) | ViewState::DetailOpen { listing, .. } => Some(listing),
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        self.listing()
            .map(|listing| listing.items.as_slice())
            .unwrap_or_default()
    }

    pub fn pagination(&self) -> Pagination {
        self.listing()
            .map(|listing| listing.pagination)
            .unwrap_or_default()
    }

    pub fn selected(&self) -> Option<&GalleryItem> {
        match &self.state {
            ViewState::DetailOpen { selected, .. } => Some(selected),
            _ => None,
        }
    }

    /// Ready with nothing to show: render the empty-state message.
    pub fn shows_empty_state(&self) -> bool {
        !self.is_loading() && self.items().is_empty()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub id: GalleryItemId,
    pub title: String,
    pub category_label: String,
    pub image_url: Option<String>,
    pub date: String,
    pub description: Option<String>,
}

pub fn card(item: &GalleryItem, categories: &CategoryStore, images: &ImageUrls) -> GalleryCard {
    GalleryCard {
        id: item.id,
        title: item.title.clone(),
        category_label: categories.label_for(&item.category).to_string(),
        image_url: images.url_for(item.image_filename()),
        date: format_date(item.created_at),
        description: item
            .description
            .clone()
            .filter(|description| !description.trim().is_empty()),
    }
}

pub fn cards(items: &[GalleryItem], categories: &CategoryStore, images: &ImageUrls) -> Vec<GalleryCard> {
    items
        .iter()
        .map(|item| card(item, categories, images))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub pages: Vec<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Pagination controls, or `None` when everything fits on one page.
pub fn pager(pagination: &Pagination) -> Option<Pager> {
    if pagination.total_pages <= 1 {
        return None;
    }
    Some(Pager {
        current: pagination.page,
        pages: (1..=pagination.total_pages).collect(),
        prev_enabled: pagination.page > 1,
        next_enabled: pagination.page < pagination.total_pages,
    })
}

pub fn status_label(status: GalleryStatus) -> &'static str {
    match status {
        GalleryStatus::Active => "Aktif",
        GalleryStatus::Inactive => "Tidak Aktif",
    }
}

/// `d/m/yyyy`, the short Indonesian date form.
pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%-d/%-m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
