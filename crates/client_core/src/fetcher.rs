use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::protocol::{GalleryItem, ListResponse, Pagination};
use tracing::{debug, warn};

use crate::{error::ClientError, query::QueryState, GalleryApi, ListScope};

/// One normalized page of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<GalleryItem>,
    pub pagination: Pagination,
}

impl Listing {
    pub fn from_response(response: ListResponse<GalleryItem>) -> Self {
        Self {
            items: response.data,
            pagination: response.pagination.unwrap_or_default().normalized(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
pub enum FetchOutcome {
    Applied { seq: u64, listing: Listing },
    /// A newer fetch was issued while this one was in flight; its result
    /// must not be applied.
    Superseded { seq: u64 },
    Failed { seq: u64, error: ClientError },
}

impl FetchOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Applied { seq, .. } | Self::Superseded { seq } | Self::Failed { seq, .. } => *seq,
        }
    }
}

/// Turns a [`QueryState`] into a listing request.
///
/// Every fetch takes the next sequence number. Responses are only handed
/// back as `Applied`/`Failed` when they belong to the most recently issued
/// fetch, so a slow response for an old query can never replace the result
/// of a newer one.
pub struct ListFetcher {
    api: Arc<dyn GalleryApi>,
    scope: ListScope,
    issued: AtomicU64,
    settled: AtomicU64,
}

impl ListFetcher {
    pub fn new(api: Arc<dyn GalleryApi>, scope: ListScope) -> Self {
        Self {
            api,
            scope,
            issued: AtomicU64::new(0),
            settled: AtomicU64::new(0),
        }
    }

    pub fn scope(&self) -> ListScope {
        self.scope
    }

    /// True while the latest issued fetch has not resolved yet.
    pub fn is_loading(&self) -> bool {
        self.settled.load(Ordering::SeqCst) < self.issued.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.issued.load(Ordering::SeqCst)
    }

    pub async fn fetch(&self, query: &QueryState) -> FetchOutcome {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let request = query.to_request(self.scope);
        debug!(
            seq,
            scope = ?self.scope,
            page = ?request.page,
            search = ?request.search,
            category = ?request.category,
            status = ?request.status,
            "gallery: fetching items"
        );

        let result = self.api.list_items(self.scope, &request).await;

        if !self.is_current(seq) {
            debug!(seq, "gallery: discarding superseded listing response");
            return FetchOutcome::Superseded { seq };
        }
        self.settled.fetch_max(seq, Ordering::SeqCst);

        match result {
            Ok(response) => {
                let listing = Listing::from_response(response);
                debug!(
                    seq,
                    items = listing.items.len(),
                    total = listing.pagination.total,
                    "gallery: listing applied"
                );
                FetchOutcome::Applied { seq, listing }
            }
            Err(error) => {
                warn!(seq, scope = ?self.scope, %error, "gallery: failed to load items");
                FetchOutcome::Failed { seq, error }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/fetcher_tests.rs"]
mod tests;
