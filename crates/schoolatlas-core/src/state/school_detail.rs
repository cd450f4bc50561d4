//! Single school state with favorite toggle.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::watch;
use tracing::warn;

use super::status::{LoadStatus, ViewState, user_message};
use crate::domain::{Localized, School};
use crate::services::CatalogService;

pub type SchoolDetailView = ViewState<Localized<School>>;

struct Inner {
    school_id: String,
    catalog: CatalogService,
    view: watch::Sender<SchoolDetailView>,
}

/// State holder for the school detail screen.
#[derive(Clone)]
pub struct SchoolDetailModel {
    inner: Arc<Inner>,
}

impl SchoolDetailModel {
    pub fn new(school_id: impl Into<String>, catalog: CatalogService) -> Self {
        let (view, _) = watch::channel(SchoolDetailView::default());
        Self {
            inner: Arc::new(Inner {
                school_id: school_id.into(),
                catalog,
                view,
            }),
        }
    }

    pub fn school_id(&self) -> &str {
        &self.inner.school_id
    }

    pub fn subscribe(&self) -> watch::Receiver<SchoolDetailView> {
        self.inner.view.subscribe()
    }

    pub fn view(&self) -> SchoolDetailView {
        self.inner.view.borrow().clone()
    }

    pub async fn load(&self) {
        let mut stream = self.inner.catalog.school(self.inner.school_id.clone());
        while let Some(state) = stream.next().await {
            self.inner.view.send_modify(|v| {
                let status = LoadStatus::of(&state);
                if let Some(Some(school)) = state.into_data() {
                    v.data = Some(school);
                }
                v.status = status;
            });
        }

        // Synced but still unknown locally and remotely.
        self.inner.view.send_modify(|v| {
            if v.data.is_none() && v.status == LoadStatus::Ready {
                v.status = LoadStatus::Failed(format!("School {} not found", self.inner.school_id));
            }
        });
    }

    pub async fn toggle_favorite(&self) {
        match self.inner.catalog.toggle_favorite(&self.inner.school_id).await {
            Ok(favorite) => self.inner.view.send_modify(|v| {
                if let Some(school) = v.data.as_mut() {
                    school.entity.is_favorite = favorite;
                }
            }),
            Err(e) => {
                warn!(school_id = %self.inner.school_id, error = %e, "Could not toggle favorite");
                self.inner
                    .view
                    .send_modify(|v| v.status = LoadStatus::Failed(user_message(&e)));
            }
        }
    }
}
