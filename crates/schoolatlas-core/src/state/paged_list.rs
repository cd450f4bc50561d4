//! Accumulation of paginated results.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{Localizable, Localized, PageRequest, Paged};

/// Items accumulated across pages.
///
/// Page 1 (or lower) replaces everything; later pages append, skipping ids
/// already present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    items: Vec<Localized<T>>,
    page: u32,
    has_more: bool,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            has_more: false,
        }
    }
}

impl<T: Localizable + Clone> PagedList<T> {
    pub fn apply(&mut self, paged: Paged<Localized<T>>) {
        if paged.page <= 1 {
            self.items = paged.items;
        } else {
            let mut seen: HashSet<String> = self.items.iter().map(|i| i.id().to_string()).collect();
            for item in paged.items {
                if seen.insert(item.id().to_string()) {
                    self.items.push(item);
                }
            }
        }
        self.page = paged.page;
        self.has_more = paged.has_more;
    }

    /// The request for the following page, if there is one.
    pub fn next_request(&self, page_size: u32) -> Option<PageRequest> {
        self.has_more.then(|| PageRequest {
            page: self.page + 1,
            page_size,
        })
    }

    pub fn items(&self) -> &[Localized<T>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [Localized<T>] {
        &mut self.items
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
