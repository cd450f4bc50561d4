//! Load status shared by every state holder.

use std::fmt;

use serde::Serialize;

use crate::sync::Resource;

/// Shown when an error carries no usable text.
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Where a holder is in its load cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

impl LoadStatus {
    pub fn of<T>(resource: &Resource<T>) -> Self {
        match resource {
            Resource::Loading(_) => Self::Loading,
            Resource::Success(_) => Self::Ready,
            Resource::Error { message, .. } => Self::Failed(user_message(message)),
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Collapse an error into the text shown to users.
pub fn user_message(err: &impl fmt::Display) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        text
    }
}

/// A single value plus its load status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    pub status: LoadStatus,
    pub data: Option<T>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            data: None,
        }
    }
}

impl<T> ViewState<T> {
    /// Fold one synchronizer state in. Data already shown is kept when the
    /// new state carries none.
    pub fn apply(&mut self, resource: Resource<T>) {
        self.status = LoadStatus::of(&resource);
        if let Some(data) = resource.into_data() {
            self.data = Some(data);
        }
    }
}
