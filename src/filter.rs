//! Search mode toggles and their mutual exclusion.
//!
//! The widget shows one checkbox per [`Filter`]. At most one of them is checked
//! at any time, which [`SearchMode`] makes unrepresentable otherwise.

use crate::types::Category;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio::sync::watch;

/// A toggle in the fixed set offered by the search widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Unscoped whole-document search
    FullText,
    /// Search restricted to one category's symbol index
    Category(Category),
}

impl Filter {
    /// All filters in checkbox order.
    pub const ALL: [Self; 3] = [
        Self::FullText,
        Self::Category(Category::Classes),
        Self::Category(Category::Functions),
    ];

    /// Wire key, as used by the widget's checkbox values.
    pub const fn key(self) -> &'static str {
        match self {
            Self::FullText => "fullTextSearch",
            Self::Category(category) => category.key(),
        }
    }

    /// Checkbox label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullText => "Full text search",
            Self::Category(category) => category.label(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    const fn mode(self) -> SearchMode {
        match self {
            Self::FullText => SearchMode::FullText,
            Self::Category(category) => SearchMode::Category(category),
        }
    }
}

/// The single active search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchMode {
    #[default]
    FullText,
    Category(Category),
    /// Every toggle is off; searches produce nothing
    Inactive,
}

/// Current state of the filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterState {
    mode: SearchMode,
}

impl FilterState {
    /// State with every toggle off.
    pub const fn inactive() -> Self {
        Self {
            mode: SearchMode::Inactive,
        }
    }

    pub const fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn is_enabled(&self, filter: Filter) -> bool {
        self.mode == filter.mode()
    }

    pub fn is_full_text(&self) -> bool {
        self.mode == SearchMode::FullText
    }

    /// Enabled categories in [`Category::ALL`] order.
    pub fn enabled_categories(&self) -> impl Iterator<Item = Category> + use<> {
        let mode = self.mode;
        Category::ALL
            .into_iter()
            .filter(move |&category| mode == SearchMode::Category(category))
    }

    /// Applies one checkbox change and returns the resulting state.
    ///
    /// Turning a filter on makes it the only enabled one. Turning the enabled
    /// filter off leaves nothing enabled; turning off a filter that was already
    /// off changes nothing.
    #[must_use]
    pub fn toggled(self, filter: Filter, enabled: bool) -> Self {
        let mode = if enabled {
            filter.mode()
        } else if self.is_enabled(filter) {
            SearchMode::Inactive
        } else {
            self.mode
        };
        Self { mode }
    }

    /// (filter, checked) pairs in checkbox order, for rendering.
    pub fn checkboxes(&self) -> [(Filter, bool); 3] {
        Filter::ALL.map(|filter| (filter, self.is_enabled(filter)))
    }
}

/// Serializes as a record of booleans keyed by [`Filter::key`].
impl Serialize for FilterState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let checkboxes = self.checkboxes();
        let mut map = serializer.serialize_map(Some(checkboxes.len()))?;
        for (filter, checked) in checkboxes {
            map.serialize_entry(filter.key(), &checked)?;
        }
        map.end()
    }
}

/// Owns the active [`FilterState`] and publishes every change.
#[derive(Debug)]
pub struct FilterController {
    state: watch::Sender<FilterState>,
}

impl Default for FilterController {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterController {
    /// Starts in full text mode with every category off.
    pub fn new() -> Self {
        let (state, _) = watch::channel(FilterState::default());
        Self { state }
    }

    /// Sets a filter and publishes the resulting state.
    pub fn toggle(&self, filter: Filter, enabled: bool) -> FilterState {
        let mut next = FilterState::default();
        self.state.send_if_modified(|state| {
            next = state.toggled(filter, enabled);
            let changed = next != *state;
            *state = next;
            changed
        });
        tracing::debug!(
            "Filter '{}' set to {}, mode is now {:?}",
            filter.key(),
            enabled,
            next.mode()
        );
        next
    }

    pub fn state(&self) -> FilterState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }
}
