//! Query normalization and category-scoped query evaluation.

use crate::filter::FilterState;
use crate::loader::IndexSlot;
use crate::types::{Category, SearchIndexItem, SearchIndexSnapshot};
use ahash::AHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::index::CategoryIndex;
use super::tokenize::tokenize;

/// Ordered matches for one evaluation, pointing into the loaded snapshot.
pub type ResultSet = Vec<Arc<SearchIndexItem>>;

/// A search term normalized into `*clause*` substring wildcards.
///
/// The term is lower-cased and split the same way indexed fields are. An
/// indexed token matches when it contains any clause. A blank term matches
/// every token (and every item); a term that is only punctuation matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    clauses: Vec<String>,
    match_all: bool,
}

impl WildcardPattern {
    /// Wraps a raw search term in leading and trailing wildcards.
    pub fn substring(term: &str) -> Self {
        let match_all = term.trim().is_empty();
        let clauses = tokenize(term);
        Self { clauses, match_all }
    }

    /// Substring clauses, already lower-cased.
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    pub const fn matches_all(&self) -> bool {
        self.match_all
    }

    /// Returns true if an indexed token satisfies this pattern.
    pub fn matches(&self, token: &str) -> bool {
        self.clause_hits(token) > 0
    }

    /// Number of clauses satisfied by an indexed token.
    pub(crate) fn clause_hits(&self, token: &str) -> usize {
        if self.match_all {
            return 1;
        }
        self.clauses
            .iter()
            .filter(|clause| token.contains(clause.as_str()))
            .count()
    }
}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.match_all {
            return f.write_str("**");
        }
        let rendered: Vec<String> = self.clauses.iter().map(|c| format!("*{}*", c)).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// One category's index plus the id lookup used to resolve its hits.
#[derive(Debug)]
struct CategoryEntry {
    index: CategoryIndex,
    /// Map from item `id` to its position in the snapshot sequence (first occurrence wins)
    positions: AHashMap<String, usize>,
}

impl CategoryEntry {
    fn build(items: &[Arc<SearchIndexItem>]) -> Self {
        let mut positions = AHashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            positions.entry(item.id.clone()).or_insert(position);
        }
        Self {
            index: CategoryIndex::build(items),
            positions,
        }
    }
}

/// Indices derived from one snapshot. Immutable once built.
#[derive(Debug)]
struct BuiltIndices {
    snapshot: Arc<SearchIndexSnapshot>,
    categories: BTreeMap<String, CategoryEntry>,
}

impl BuiltIndices {
    fn build(snapshot: Arc<SearchIndexSnapshot>) -> Self {
        let start = std::time::Instant::now();
        let categories: BTreeMap<String, CategoryEntry> = snapshot
            .categories()
            .map(|(name, items)| (name.to_string(), CategoryEntry::build(items)))
            .collect();

        tracing::info!(
            "Built search indices for {} categories ({} items) in {:?}",
            categories.len(),
            snapshot.item_count(),
            start.elapsed()
        );

        Self {
            snapshot,
            categories,
        }
    }
}

/// Evaluates search terms against the per-category indices of the loaded snapshot.
///
/// The engine reads the snapshot through an explicitly injected [`IndexSlot`].
/// Every query first picks up a newly filled slot; until the slot is filled,
/// queries yield an empty [`ResultSet`].
#[derive(Debug)]
pub struct QueryEngine {
    slot: IndexSlot,
    built: Option<BuiltIndices>,
}

impl QueryEngine {
    /// Creates an engine over the slot, building indices if it is already filled.
    pub fn new(slot: IndexSlot) -> Self {
        let mut engine = Self { slot, built: None };
        engine.refresh();
        engine
    }

    /// Rebuilds all category indices if the slot holds a different snapshot than
    /// the one last built. Returns true if a rebuild happened.
    pub fn refresh(&mut self) -> bool {
        let Some(snapshot) = self.slot.get() else {
            return false;
        };
        if let Some(built) = &self.built
            && Arc::ptr_eq(&built.snapshot, &snapshot)
        {
            return false;
        }
        self.built = Some(BuiltIndices::build(snapshot));
        true
    }

    /// Returns true once indices have been built from a loaded snapshot.
    pub const fn is_ready(&self) -> bool {
        self.built.is_some()
    }

    /// The snapshot the current indices were built from.
    pub fn snapshot(&self) -> Option<&Arc<SearchIndexSnapshot>> {
        self.built.as_ref().map(|b| &b.snapshot)
    }

    /// Runs a full evaluation of the term under the given filters.
    ///
    /// Enabled categories are queried independently and concatenated in
    /// [`Category::ALL`] order; scores are never compared across categories.
    /// Full text mode is not served by the category indices and yields nothing.
    pub fn search(&mut self, term: &str, filters: &FilterState) -> ResultSet {
        self.refresh();
        if self.built.is_none() {
            tracing::debug!("Search index not loaded yet, no results for {:?}", term);
            return Vec::new();
        }

        if filters.is_full_text() {
            tracing::debug!("Full text search is not served by category indices");
            return Vec::new();
        }

        let pattern = WildcardPattern::substring(term);
        let results: ResultSet = filters
            .enabled_categories()
            .flat_map(|category| self.search_category(category, &pattern))
            .collect();

        tracing::debug!(
            "Query {} under {:?} matched {} items",
            pattern,
            filters.mode(),
            results.len()
        );
        results
    }

    /// Queries a single category and resolves hits back to snapshot items.
    ///
    /// Hits whose `id` is missing from the snapshot are dropped.
    fn search_category(&self, category: Category, pattern: &WildcardPattern) -> ResultSet {
        let Some(built) = &self.built else {
            return Vec::new();
        };
        let (Some(entry), Some(items)) = (
            built.categories.get(category.key()),
            built.snapshot.items(category.key()),
        ) else {
            tracing::debug!("Category '{}' is not present in the search index", category);
            return Vec::new();
        };

        entry
            .index
            .search(pattern)
            .into_iter()
            .filter_map(|hit| {
                let resolved = entry
                    .positions
                    .get(hit.reference)
                    .and_then(|&position| items.get(position))
                    .cloned();
                if resolved.is_none() {
                    tracing::warn!(
                        "Dropping unresolvable hit '{}' in category '{}'",
                        hit.reference,
                        category
                    );
                }
                resolved
            })
            .collect()
    }
}
