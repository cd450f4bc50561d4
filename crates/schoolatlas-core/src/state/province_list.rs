//! Province list state for one country.

use std::sync::Arc;

use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use super::debounce::SearchDebouncer;
use super::status::LoadStatus;
use crate::domain::{Localized, Province, ProvinceFilters, filter_and_sort_provinces};
use crate::services::{CatalogService, SettingsService};
use crate::settings::SettingsUpdate;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProvinceListView {
    pub status: LoadStatus,
    pub query: String,
    pub filters: ProvinceFilters,
    pub provinces: Vec<Localized<Province>>,
    #[serde(skip)]
    snapshot: Vec<Localized<Province>>,
}

impl ProvinceListView {
    pub fn snapshot(&self) -> &[Localized<Province>] {
        &self.snapshot
    }

    fn recompute(&mut self) {
        self.provinces = filter_and_sort_provinces(&self.snapshot, &self.query, &self.filters);
    }
}

struct Inner {
    country_id: String,
    catalog: CatalogService,
    settings: SettingsService,
    view: watch::Sender<ProvinceListView>,
    debouncer: SearchDebouncer,
}

/// State holder for a country's provinces.
#[derive(Clone)]
pub struct ProvinceListModel {
    inner: Arc<Inner>,
}

impl ProvinceListModel {
    pub fn new(
        country_id: impl Into<String>,
        catalog: CatalogService,
        settings: SettingsService,
    ) -> Self {
        let (view, _) = watch::channel(ProvinceListView::default());
        Self {
            inner: Arc::new(Inner {
                country_id: country_id.into(),
                catalog,
                settings,
                view,
                debouncer: SearchDebouncer::default(),
            }),
        }
    }

    pub fn country_id(&self) -> &str {
        &self.inner.country_id
    }

    pub fn subscribe(&self) -> watch::Receiver<ProvinceListView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> ProvinceListView {
        self.inner.view.borrow().clone()
    }

    pub async fn load(&self) {
        match self.inner.settings.get().await {
            Ok(settings) => {
                if let Some(order) = settings.province_sort_order {
                    self.inner.view.send_modify(|v| v.filters.sort_order = order);
                }
            }
            Err(e) => warn!(error = %e, "Could not restore province sort order"),
        }

        let mut stream = self.inner.catalog.provinces(self.inner.country_id.clone());
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

    pub fn set_query_debounced(&self, query: impl Into<String>) {
        let model = self.clone();
        let query = query.into();
        self.inner.debouncer.schedule(async move {
            model.set_query(query);
        });
    }

    /// Apply new filters; the sort order is remembered for next time.
    pub async fn set_filters(&self, filters: ProvinceFilters) {
        let order = filters.sort_order;
        let changed_order = self.inner.view.borrow().filters.sort_order != order;
        self.inner.view.send_modify(|v| {
            v.filters = filters;
            v.recompute();
        });

        if changed_order {
            let update = SettingsUpdate {
                province_sort_order: Some(Some(order)),
                ..Default::default()
            };
            if let Err(e) = self.inner.settings.update(update).await {
                warn!(error = %e, "Could not persist province sort order");
            }
        }
    }

    /// Drop type and school-count filters, keeping the sort order.
    pub fn clear_filters(&self) {
        self.inner.view.send_modify(|v| {
            v.filters = ProvinceFilters {
                sort_order: v.filters.sort_order,
                ..Default::default()
            };
            v.recompute();
        });
    }
}
