//! Paginated school list state for one province.
//!
//! Pages accumulate in a [`PagedList`]; search text and [`SchoolFilters`]
//! are applied locally over everything loaded so far.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use super::debounce::SearchDebouncer;
use super::paged_list::PagedList;
use super::status::{LoadStatus, user_message};
use crate::domain::{
    DEFAULT_PAGE_SIZE, Localized, PageRequest, School, SchoolFilters, SchoolType,
    available_school_types, filter_and_sort_schools,
};
use crate::services::{CatalogService, SettingsService};
use crate::settings::SettingsUpdate;
use crate::sync::Resource;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchoolListView {
    pub status: LoadStatus,
    pub query: String,
    pub filters: SchoolFilters,
    /// Loaded schools after search, filters and sort.
    pub schools: Vec<Localized<School>>,
    /// Types present among loaded schools.
    pub available_types: BTreeSet<SchoolType>,
    pub has_more: bool,
    pub loading_more: bool,
    #[serde(skip)]
    pages: PagedList<School>,
}

impl SchoolListView {
    pub fn loaded(&self) -> &[Localized<School>] {
        self.pages.items()
    }

    pub fn active_filter_count(&self) -> usize {
        self.filters.active_filter_count()
    }

    fn recompute(&mut self) {
        self.schools = filter_and_sort_schools(self.pages.items(), &self.query, &self.filters);
        self.available_types = available_school_types(self.pages.items());
        self.has_more = self.pages.has_more();
    }
}

struct Inner {
    province_id: String,
    catalog: CatalogService,
    settings: SettingsService,
    view: watch::Sender<SchoolListView>,
    debouncer: SearchDebouncer,
    page_size: AtomicU32,
    /// Serializes page loads.
    fetch: Mutex<()>,
}

/// State holder for a province's schools.
#[derive(Clone)]
pub struct SchoolListModel {
    inner: Arc<Inner>,
}

impl SchoolListModel {
    pub fn new(
        province_id: impl Into<String>,
        catalog: CatalogService,
        settings: SettingsService,
    ) -> Self {
        let (view, _) = watch::channel(SchoolListView::default());
        Self {
            inner: Arc::new(Inner {
                province_id: province_id.into(),
                catalog,
                settings,
                view,
                debouncer: SearchDebouncer::default(),
                page_size: AtomicU32::new(DEFAULT_PAGE_SIZE),
                fetch: Mutex::new(()),
            }),
        }
    }

    pub fn province_id(&self) -> &str {
        &self.inner.province_id
    }

    pub fn subscribe(&self) -> watch::Receiver<SchoolListView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> SchoolListView {
        self.inner.view.borrow().clone()
    }

    fn page_size(&self) -> u32 {
        self.inner.page_size.load(Ordering::Relaxed)
    }

    /// Restore saved filters and page size, then load page 1.
    pub async fn load(&self) {
        match self.inner.settings.get().await {
            Ok(settings) => {
                self.inner
                    .page_size
                    .store(settings.effective_page_size(), Ordering::Relaxed);
                if let Some(filters) = settings.school_filters {
                    self.inner.view.send_modify(|v| v.filters = filters);
                }
            }
            Err(e) => warn!(error = %e, "Could not restore school filters"),
        }
        self.refresh().await;
    }

    /// Reload from page 1, replacing what was loaded.
    pub async fn refresh(&self) {
        let _guard = self.inner.fetch.lock().await;
        self.run_page(PageRequest::first(self.page_size())).await;
    }

    /// Append the next page, if any. Ignored while another load is running.
    pub async fn load_more(&self) {
        let Ok(_guard) = self.inner.fetch.try_lock() else {
            debug!(province_id = %self.inner.province_id, "Load already in progress");
            return;
        };
        let Some(request) = self.inner.view.borrow().pages.next_request(self.page_size()) else {
            return;
        };
        self.inner.view.send_modify(|v| v.loading_more = true);
        self.run_page(request).await;
        self.inner.view.send_modify(|v| v.loading_more = false);
    }

    async fn run_page(&self, request: PageRequest) {
        let mut stream = self.inner.catalog.schools(
            self.inner.province_id.clone(),
            remote_type(&self.inner.view.borrow().filters),
            request,
        );
        while let Some(state) = stream.next().await {
            self.inner.view.send_modify(|v| {
                v.status = LoadStatus::of(&state);
                // Later pages only count once fetched; a failure keeps the
                // pages already shown and the position to retry from.
                let data = match state {
                    Resource::Success(data) => Some(data),
                    other if request.is_first() => other.into_data(),
                    _ => None,
                };
                if let Some(data) = data {
                    v.pages.apply(data);
                }
                v.recompute();
            });
        }
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.inner.view.send_modify(|v| {
            v.query = query;
            v.recompute();
        });
    }

    pub fn set_query_debounced(&self, query: impl Into<String>) {
        let model = self.clone();
        let query = query.into();
        self.inner.debouncer.schedule(async move {
            model.set_query(query);
        });
    }

    /// Apply and remember new filters.
    ///
    /// Pages restart from 1 when the remotely narrowed type changes, since
    /// loaded pages belong to the previous remote collection.
    pub async fn set_filters(&self, filters: SchoolFilters) {
        self.apply_filters(filters.clone()).await;
        self.persist_filters(Some(filters)).await;
    }

    pub async fn clear_filters(&self) {
        self.apply_filters(SchoolFilters::default()).await;
        self.persist_filters(None).await;
    }

    async fn apply_filters(&self, filters: SchoolFilters) {
        let mut narrowing_changed = false;
        self.inner.view.send_modify(|v| {
            narrowing_changed = remote_type(&v.filters) != remote_type(&filters);
            v.filters = filters;
            v.recompute();
        });
        if narrowing_changed {
            debug!(province_id = %self.inner.province_id, "Remote type changed, reloading from page 1");
            self.refresh().await;
        }
    }

    async fn persist_filters(&self, filters: Option<SchoolFilters>) {
        let update = SettingsUpdate {
            school_filters: Some(filters),
            ..Default::default()
        };
        if let Err(e) = self.inner.settings.update(update).await {
            warn!(error = %e, "Could not persist school filters");
        }
    }

    /// Flip a school's favorite flag and reflect it in the list.
    pub async fn toggle_favorite(&self, school_id: &str) {
        match self.inner.catalog.toggle_favorite(school_id).await {
            Ok(favorite) => self.inner.view.send_modify(|v| {
                if let Some(school) = v
                    .pages
                    .items_mut()
                    .iter_mut()
                    .find(|s| s.entity.id == school_id)
                {
                    school.entity.is_favorite = favorite;
                }
                v.recompute();
            }),
            Err(e) => {
                warn!(school_id, error = %e, "Could not toggle favorite");
                self.inner
                    .view
                    .send_modify(|v| v.status = LoadStatus::Failed(user_message(&e)));
            }
        }
    }
}

/// A single selected type is narrowed remotely as well.
fn remote_type(filters: &SchoolFilters) -> Option<SchoolType> {
    match filters.types.len() {
        1 => filters.types.iter().next().copied(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Language, RangeValues, SchoolSortOrder};
    use crate::ports::CatalogRemotePort;
    use crate::settings::Settings;
    use crate::test_support::{FakeRemote, MemoryStore, bare, country, province, school};

    async fn model(count: usize, page_size: u32) -> (SchoolListModel, Arc<MemoryStore>, Arc<FakeRemote>) {
        let store = Arc::new(MemoryStore::default());
        store.seed_countries(vec![country("ke", "Kenya", 60)]).await;
        store.seed_provinces(vec![province("nbi", "ke", "Nairobi")]).await;
        crate::ports::SettingsRepository::save(
            store.as_ref(),
            &Settings {
                page_size: Some(page_size),
                ..Settings::with_defaults()
            },
        )
        .await
        .unwrap();

        let remote = Arc::new(FakeRemote::default());
        *remote.schools.lock().await = (0..count)
            .map(|i| {
                let mut s = school(&format!("s{i:02}"), "nbi", &format!("School {i:02}"));
                s.rating = (i % 5) as f32;
                s.school_type = if i % 2 == 0 {
                    SchoolType::Primary
                } else {
                    SchoolType::Secondary
                };
                bare(s)
            })
            .collect();

        let repos = store.repos();
        let catalog = CatalogService::new(
            repos.clone(),
            Arc::clone(&remote) as Arc<dyn CatalogRemotePort>,
            Language::English,
        );
        let model = SchoolListModel::new("nbi", catalog, SettingsService::new(repos.settings));
        (model, store, remote)
    }

    #[tokio::test]
    async fn test_load_then_load_more_accumulates() {
        let (model, _, _) = model(5, 2).await;
        model.load().await;
        let view = model.view();
        assert_eq!(view.status, LoadStatus::Ready);
        assert_eq!(view.loaded().len(), 2);
        assert!(view.has_more);

        model.load_more().await;
        model.load_more().await;
        let view = model.view();
        assert_eq!(view.loaded().len(), 5);
        assert!(!view.has_more);
        assert!(!view.loading_more);
    }

    #[tokio::test]
    async fn test_load_more_without_more_pages_is_noop() {
        let (model, _, remote) = model(2, 5).await;
        model.load().await;
        let calls = remote.call_count();
        model.load_more().await;
        assert_eq!(remote.call_count(), calls);
    }

    #[tokio::test]
    async fn test_refresh_replaces_pages() {
        let (model, _, _) = model(5, 2).await;
        model.load().await;
        model.load_more().await;
        assert_eq!(model.view().loaded().len(), 4);

        model.refresh().await;
        // Page 1 replaces; cached page-1 emission held everything stored so far.
        assert_eq!(model.view().loaded().len(), 2);
    }

    #[tokio::test]
    async fn test_filters_apply_locally_and_persist() {
        let (model, store, _) = model(6, 10).await;
        model.load().await;
        assert_eq!(
            model.view().available_types,
            [SchoolType::Primary, SchoolType::Secondary].into()
        );

        let filters = SchoolFilters {
            rating_range: RangeValues::new(3.0, 5.0),
            sort_order: SchoolSortOrder::RatingDesc,
            ..Default::default()
        };
        model.set_filters(filters.clone()).await;
        let view = model.view();
        let ratings: Vec<f32> = view.schools.iter().map(|s| s.entity.rating).collect();
        assert_eq!(ratings, vec![4.0, 3.0]);
        assert_eq!(view.active_filter_count(), 1);

        let saved = crate::ports::SettingsRepository::load(store.as_ref())
            .await
            .unwrap();
        assert_eq!(saved.school_filters, Some(filters));

        model.clear_filters().await;
        assert_eq!(model.view().schools.len(), 6);
    }

    #[tokio::test]
    async fn test_query_matches_name() {
        let (model, _, _) = model(12, 20).await;
        model.load().await;
        model.set_query("school 1");
        let ids: Vec<String> = model.view().schools.iter().map(|s| s.entity.id.clone()).collect();
        assert_eq!(ids, vec!["s10", "s11"]);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_loaded_items() {
        let (model, _, remote) = model(5, 2).await;
        model.load().await;
        remote.set_offline(true);
        model.load_more().await;

        let view = model.view();
        assert_eq!(view.loaded().len(), 2);
        assert!(view.status.error().is_some());
        assert!(view.has_more);
    }

    #[tokio::test]
    async fn test_offline_refresh_disables_paging_until_online() {
        let (model, _, remote) = model(5, 2).await;
        model.load().await;
        remote.set_offline(true);
        model.refresh().await;

        let view = model.view();
        assert_eq!(view.loaded().len(), 2);
        assert!(view.status.error().is_some());
        assert!(!view.has_more);

        remote.set_offline(false);
        model.refresh().await;
        assert!(model.view().has_more);
    }

    #[tokio::test]
    async fn test_toggle_favorite_updates_list() {
        let (model, _, _) = model(2, 10).await;
        model.load().await;
        model.toggle_favorite("s01").await;
        let view = model.view();
        let fav = view.schools.iter().find(|s| s.entity.id == "s01").unwrap();
        assert!(fav.entity.is_favorite);
    }

    #[tokio::test]
    async fn test_type_narrowing_restarts_paging() {
        let (model, _, _) = model(8, 2).await;
        model.load().await;

        model
            .set_filters(SchoolFilters {
                types: [SchoolType::Primary].into(),
                ..Default::default()
            })
            .await;
        while model.view().has_more {
            model.load_more().await;
        }

        let ids: Vec<String> = model.view().schools.iter().map(|s| s.entity.id.clone()).collect();
        assert_eq!(ids, vec!["s00", "s02", "s04", "s06"]);
    }

    #[tokio::test]
    async fn test_clearing_type_narrowing_restarts_paging() {
        let (model, _, _) = model(6, 2).await;
        model.load().await;
        model
            .set_filters(SchoolFilters {
                types: [SchoolType::Secondary].into(),
                ..Default::default()
            })
            .await;
        model.load_more().await;

        model.clear_filters().await;
        while model.view().has_more {
            model.load_more().await;
        }
        assert_eq!(model.view().schools.len(), 6);
    }

    #[tokio::test]
    async fn test_local_only_filters_keep_pages() {
        let (model, _, remote) = model(5, 2).await;
        model.load().await;
        model.load_more().await;
        let calls = remote.call_count();

        model
            .set_filters(SchoolFilters {
                min_established_year: Some(1900),
                ..Default::default()
            })
            .await;
        assert_eq!(remote.call_count(), calls);
        assert_eq!(model.view().loaded().len(), 4);
    }

    #[test]
    fn test_single_type_narrows_remotely() {
        let mut filters = SchoolFilters::default();
        assert_eq!(remote_type(&filters), None);
        filters.types.insert(SchoolType::University);
        assert_eq!(remote_type(&filters), Some(SchoolType::University));
        filters.types.insert(SchoolType::Technical);
        assert_eq!(remote_type(&filters), None);
    }
}
