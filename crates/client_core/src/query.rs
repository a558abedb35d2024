//! User-controlled listing parameters.
//!
//! `QueryState` is a value: every handler consumes the old state and returns
//! the next one. Changing any filter sends the listing back to page 1.

use shared::{domain::GalleryStatus, protocol::ListItemsQuery};

use crate::ListScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub category_filter: String,
    pub status_filter: Option<GalleryStatus>,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category_filter: String::new(),
            status_filter: None,
            page: 1,
        }
    }
}

impl QueryState {
    pub fn with_search(self, search_term: impl Into<String>) -> Self {
        let search_term = search_term.into();
        if search_term == self.search_term {
            return self;
        }
        Self {
            search_term,
            page: 1,
            ..self
        }
    }

    pub fn with_category(self, category_filter: impl Into<String>) -> Self {
        let category_filter = category_filter.into();
        if category_filter == self.category_filter {
            return self;
        }
        Self {
            category_filter,
            page: 1,
            ..self
        }
    }

    pub fn with_status(self, status_filter: Option<GalleryStatus>) -> Self {
        if status_filter == self.status_filter {
            return self;
        }
        Self {
            status_filter,
            page: 1,
            ..self
        }
    }

    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Wire parameters for `scope`. Empty filters are left out; the admin
    /// listing is a single capped page and never sends `page`.
    pub fn to_request(&self, scope: ListScope) -> ListItemsQuery {
        let non_empty = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        ListItemsQuery {
            page: match scope {
                ListScope::Public => Some(self.page),
                ListScope::Admin => None,
            },
            limit: Some(scope.page_size()),
            search: non_empty(&self.search_term),
            category: non_empty(&self.category_filter),
            status: match scope {
                ListScope::Public => None,
                ListScope::Admin => self.status_filter.map(|status| status.as_str().to_string()),
            },
        }
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
