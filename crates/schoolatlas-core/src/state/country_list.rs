//! Country list state: search text and sort order over the synced snapshot.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use super::debounce::SearchDebouncer;
use super::status::LoadStatus;
use crate::domain::{Country, CountrySortOrder, Localized, filter_and_sort_countries};
use crate::services::{CatalogService, SettingsService};
use crate::settings::SettingsUpdate;

/// What the country list screen renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryListView {
    pub status: LoadStatus,
    pub query: String,
    pub sort_order: CountrySortOrder,
    /// Snapshot after search and sort.
    pub countries: Vec<Localized<Country>>,
    #[serde(skip)]
    snapshot: Vec<Localized<Country>>,
}

impl CountryListView {
    /// Everything synced, before search and sort.
    pub fn snapshot(&self) -> &[Localized<Country>] {
        &self.snapshot
    }

    fn recompute(&mut self) {
        self.countries = filter_and_sort_countries(&self.snapshot, &self.query, self.sort_order);
    }
}

struct Inner {
    catalog: CatalogService,
    settings: SettingsService,
    view: watch::Sender<CountryListView>,
    debouncer: SearchDebouncer,
}

/// State holder for the country list.
#[derive(Clone)]
pub struct CountryListModel {
    inner: Arc<Inner>,
}

impl CountryListModel {
    pub fn new(catalog: CatalogService, settings: SettingsService) -> Self {
        Self::with_debouncer(catalog, settings, SearchDebouncer::default())
    }

    pub fn with_debouncer(
        catalog: CatalogService,
        settings: SettingsService,
        debouncer: SearchDebouncer,
    ) -> Self {
        let (view, _) = watch::channel(CountryListView::default());
        Self {
            inner: Arc::new(Inner {
                catalog,
                settings,
                view,
                debouncer,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CountryListView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> CountryListView {
        self.inner.view.borrow().clone()
    }

    /// Restore the persisted sort order, then run one sync cycle.
    pub async fn load(&self) {
        match self.inner.settings.get().await {
            Ok(settings) => {
                if let Some(order) = settings.country_sort_order {
                    self.inner.view.send_modify(|v| v.sort_order = order);
                }
            }
            Err(e) => warn!(error = %e, "Could not restore country sort order"),
        }

        let mut stream = self.inner.catalog.countries();
        while let Some(state) = stream.next().await {
            self.inner.view.send_modify(|v| {
                v.status = LoadStatus::of(&state);
                if let Some(data) = state.into_data() {
                    v.snapshot = data;
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

    /// Like [`set_query`](Self::set_query), applied once typing pauses.
    pub fn set_query_debounced(&self, query: impl Into<String>) {
        let model = self.clone();
        let query = query.into();
        self.inner.debouncer.schedule(async move {
            model.set_query(query);
        });
    }

    /// Re-sort and remember the order for next time.
    pub async fn set_sort_order(&self, order: CountrySortOrder) {
        self.inner.view.send_modify(|v| {
            v.sort_order = order;
            v.recompute();
        });

        let update = SettingsUpdate {
            country_sort_order: Some(Some(order)),
            ..Default::default()
        };
        if let Err(e) = self.inner.settings.update(update).await {
            warn!(error = %e, "Could not persist country sort order");
        }
    }
}
