//! Property dashboard state: the loaded list, the current selection and the
//! load status, plus everything the UI derives from them.

pub mod loader;
pub mod selection;

use std::sync::Arc;

use crate::api::{Property, PropertySource};

pub use loader::{Liveness, LoadOutcome, LoadPoll, PendingLoad};
pub use selection::reconcile_selection;

pub const LOADING_MESSAGE: &str = "Loading properties…";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load properties";
pub const EMPTY_MESSAGE: &str = "No properties available";
pub const PROMPT_MESSAGE: &str = "Select a property to view revenue.";

/// The single status line shown under the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Loading,
    Error(&'a str),
    Empty,
}

impl Status<'_> {
    pub fn message(&self) -> &str {
        match self {
            Status::Loading => LOADING_MESSAGE,
            Status::Error(msg) => *msg,
            Status::Empty => EMPTY_MESSAGE,
        }
    }
}

/// What the content pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content<'a> {
    Summary { property_id: &'a str },
    Prompt,
}

pub struct Dashboard {
    properties: Vec<Property>,
    selected: String,
    loading: bool,
    error: String,
    liveness: Liveness,
    mounted: bool,
}

impl Dashboard {
    /// A fresh, not yet mounted dashboard. It renders as loading until the
    /// first load resolves.
    pub fn new() -> Self {
        Self {
            properties: Vec::new(),
            selected: String::new(),
            loading: true,
            error: String::new(),
            liveness: Liveness::new(),
            mounted: false,
        }
    }

    /// Start the one-time property load. Returns `None` if this dashboard
    /// was already mounted.
    pub fn mount(&mut self, source: Arc<dyn PropertySource>) -> Option<PendingLoad> {
        if self.mounted {
            tracing::debug!("Dashboard already mounted, not reloading");
            return None;
        }
        self.mounted = true;

        self.loading = true;
        self.error.clear();

        Some(PendingLoad::spawn(source, self.liveness.clone()))
    }

    /// Apply a finished load. Ignored entirely once unmounted.
    pub fn apply(&mut self, outcome: LoadOutcome) {
        if !self.liveness.is_live() {
            tracing::debug!("Ignoring load result for unmounted dashboard");
            return;
        }

        match outcome {
            LoadOutcome::Loaded(list) => {
                self.selected = reconcile_selection(&self.selected, &list);
                self.properties = list;
            }
            LoadOutcome::Failed => {
                self.error = LOAD_FAILED_MESSAGE.to_string();
            }
        }

        self.loading = false;
    }

    /// Tear down. Any load still in flight will not touch this dashboard.
    pub fn unmount(&mut self) {
        self.liveness.revoke();
    }

    /// User picked a property. Not validated against the list.
    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = id.into();
    }

    pub fn status(&self) -> Option<Status<'_>> {
        if self.loading {
            Some(Status::Loading)
        } else if !self.error.is_empty() {
            Some(Status::Error(&self.error))
        } else if self.properties.is_empty() {
            Some(Status::Empty)
        } else {
            None
        }
    }

    pub fn content(&self) -> Content<'_> {
        if self.selected.is_empty() {
            Content::Prompt
        } else {
            Content::Summary { property_id: &self.selected }
        }
    }

    pub fn selector_enabled(&self) -> bool {
        !self.loading && !self.properties.is_empty()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn selected_property(&self) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == self.selected)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}
