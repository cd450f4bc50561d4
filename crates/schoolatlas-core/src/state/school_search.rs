//! Catalog-wide school search state.
//!
//! Changing the query or the filters starts over at page 1; `load_more`
//! appends the next page of the current search.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::debug;

use super::debounce::SearchDebouncer;
use super::paged_list::PagedList;
use super::status::LoadStatus;
use crate::domain::{DEFAULT_PAGE_SIZE, Localized, PageRequest, School, SchoolSearch, SearchFilters};
use crate::services::CatalogService;
use crate::sync::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchoolSearchView {
    pub status: LoadStatus,
    pub query: String,
    pub filters: SearchFilters,
    pub results: Vec<Localized<School>>,
    pub has_more: bool,
    #[serde(skip)]
    pages: PagedList<School>,
}

impl SchoolSearchView {
    fn sync_results(&mut self) {
        self.results = self.pages.items().to_vec();
        self.has_more = self.pages.has_more();
    }

    fn search(&self) -> SchoolSearch {
        SchoolSearch::new(self.query.clone(), self.filters.clone())
    }
}

struct Inner {
    catalog: CatalogService,
    view: watch::Sender<SchoolSearchView>,
    debouncer: SearchDebouncer,
    page_size: u32,
    fetch: Mutex<()>,
}

/// State holder for the search screen.
#[derive(Clone)]
pub struct SchoolSearchModel {
    inner: Arc<Inner>,
}

impl SchoolSearchModel {
    pub fn new(catalog: CatalogService) -> Self {
        Self::with_page_size(catalog, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(catalog: CatalogService, page_size: u32) -> Self {
        let (view, _) = watch::channel(SchoolSearchView::default());
        Self {
            inner: Arc::new(Inner {
                catalog,
                view,
                debouncer: SearchDebouncer::default(),
                page_size: PageRequest::first(page_size).page_size,
                fetch: Mutex::new(()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SchoolSearchView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> SchoolSearchView {
        self.inner.view.borrow().clone()
    }

    /// Replace the query and search from page 1.
    ///
    /// A blank query clears the results without touching the network.
    pub async fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.inner.view.send_modify(|v| v.query = query);
        self.restart().await;
    }

    pub fn set_query_debounced(&self, query: impl Into<String>) {
        let model = self.clone();
        let query = query.into();
        self.inner.debouncer.schedule(async move {
            model.set_query(query).await;
        });
    }

    /// Replace the filters and search from page 1.
    pub async fn set_filters(&self, filters: SearchFilters) {
        self.inner.view.send_modify(|v| v.filters = filters);
        self.restart().await;
    }

    async fn restart(&self) {
        let _guard = self.inner.fetch.lock().await;
        let search = self.inner.view.borrow().search();
        if search.query.trim().is_empty() {
            self.inner.view.send_modify(|v| {
                v.pages.clear();
                v.status = LoadStatus::Idle;
                v.sync_results();
            });
            return;
        }
        self.run_page(search, PageRequest::first(self.inner.page_size)).await;
    }

    /// Append the next page of the current search.
    pub async fn load_more(&self) {
        let Ok(_guard) = self.inner.fetch.try_lock() else {
            debug!("Search already in progress");
            return;
        };
        let (search, request) = {
            let view = self.inner.view.borrow();
            (view.search(), view.pages.next_request(self.inner.page_size))
        };
        if let Some(request) = request {
            self.run_page(search, request).await;
        }
    }

    async fn run_page(&self, search: SchoolSearch, request: PageRequest) {
        let mut stream = self.inner.catalog.search_schools(search.clone(), request);
        while let Some(state) = stream.next().await {
            self.inner.view.send_modify(|v| {
                // A newer search replaced this one while it was running.
                if v.query != search.query || v.filters != search.filters {
                    return;
                }
                v.status = LoadStatus::of(&state);
                let data = match state {
                    Resource::Success(data) => Some(data),
                    other if request.is_first() => other.into_data(),
                    _ => None,
                };
                if let Some(data) = data {
                    v.pages.apply(data);
                }
                v.sync_results();
            });
        }
    }
}
