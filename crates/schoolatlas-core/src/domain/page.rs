//! Pagination types shared by the remote port and list state.

use serde::{Deserialize, Serialize};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound accepted for a page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// First page with the given size (clamped to `1..=MAX_PAGE_SIZE`).
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self {
            page: self.page + 1,
            page_size: self.page_size,
        }
    }

    pub const fn is_first(self) -> bool {
        self.page <= 1
    }
}

/// One page of a remote listing, as returned by paginated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether another page follows, judged from this page's metadata only.
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
            page: self.page,
            total_pages: self.total_pages,
        }
    }
}

/// A page-sized slice of list data handed to list state.
///
/// Page 1 replaces accumulated items; later pages append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub has_more: bool,
}

impl<T> Paged<T> {
    pub const fn new(items: Vec<T>, page: u32, has_more: bool) -> Self {
        Self {
            items,
            page,
            has_more,
        }
    }
}

impl<T> From<Page<T>> for Paged<T> {
    fn from(page: Page<T>) -> Self {
        let has_more = page.has_more();
        Self {
            items: page.items,
            page: page.page,
            has_more,
        }
    }
}
