//! Data model for the static symbol index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// One searchable symbol from the documentation index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchIndexItem {
    /// Reference key, unique within its category
    pub id: String,
    /// Display label; primary relevance signal
    pub name: String,
    /// Navigation target; secondary relevance signal
    pub uri: String,
}

impl SearchIndexItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            uri: uri.into(),
        }
    }
}

/// A named partition of searchable items.
///
/// Variant order is the fixed order in which results from several categories
/// are concatenated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Classes,
    Functions,
    // Methods/attributes are not emitted by the index generator yet.
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Self; 2] = [Self::Classes, Self::Functions];

    /// Key of this category in the index payload.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Classes => "classes",
            Self::Functions => "functions",
        }
    }

    /// Human-readable checkbox label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Classes => "Classes",
            Self::Functions => "Functions",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The loaded index payload: category name to ordered items.
///
/// Items are held behind `Arc` so result sets can point into the snapshot
/// without copying records. A snapshot is never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndexSnapshot {
    categories: BTreeMap<String, Vec<Arc<SearchIndexItem>>>,
}

impl SearchIndexSnapshot {
    /// Parse a snapshot from the JSON payload.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Items for a category name, if the payload contains it.
    pub fn items(&self, category: &str) -> Option<&[Arc<SearchIndexItem>]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Iterate over (category name, items) pairs in key order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &[Arc<SearchIndexItem>])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn item_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

impl<N, I> FromIterator<(N, I)> for SearchIndexSnapshot
where
    N: Into<String>,
    I: IntoIterator<Item = SearchIndexItem>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let categories = iter
            .into_iter()
            .map(|(name, items)| (name.into(), items.into_iter().map(Arc::new).collect()))
            .collect();
        Self { categories }
    }
}
