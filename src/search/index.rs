//! Per-category inverted index with field boosting.

use crate::types::SearchIndexItem;
use ahash::AHashMap;
use std::sync::Arc;

use super::query::WildcardPattern;
use super::tokenize::tokenize;

/// Relevance multiplier for matches in an item's display name.
pub const NAME_BOOST: f32 = 10.0;

/// Relevance multiplier for matches in an item's URI.
pub const URI_BOOST: f32 = 1.0;

/// Indexed fields of a [`SearchIndexItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Uri,
}

impl Field {
    const fn boost(self) -> f32 {
        match self {
            Self::Name => NAME_BOOST,
            Self::Uri => URI_BOOST,
        }
    }

    fn text(self, item: &SearchIndexItem) -> &str {
        match self {
            Self::Name => &item.name,
            Self::Uri => &item.uri,
        }
    }
}

/// A single match returned by [`CategoryIndex::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit<'a> {
    /// The `id` of the matched item
    pub reference: &'a str,
    pub score: f32,
}

/// Searchable structure over one category's items, keyed by item `id`.
///
/// Built once from a snapshot and never patched; a new snapshot means a new index.
#[derive(Debug, Clone)]
pub struct CategoryIndex {
    /// Map from term to (document index, boosted tf-idf score) pairs, ordered by document index
    terms: AHashMap<String, Vec<(usize, f32)>>,
    /// Sorted vocabulary, scanned for wildcard expansion
    vocabulary: Vec<String>,
    /// Map from document index to item `id`, in insertion order
    refs: Vec<String>,
}

impl CategoryIndex {
    /// Builds an index over items in the given order.
    pub fn build(items: &[Arc<SearchIndexItem>]) -> Self {
        let mut builder = CategoryIndexBuilder::default();
        for item in items {
            builder.add(item);
        }
        builder.finalize()
    }

    /// Searches for items whose name or uri contains the pattern.
    ///
    /// Results are sorted by score, highest first. Equal scores keep the order
    /// in which items were added.
    pub fn search(&self, pattern: &WildcardPattern) -> Vec<IndexHit<'_>> {
        let mut combined_scores: AHashMap<usize, f32> = AHashMap::new();

        for term in self.vocabulary.iter().filter(|t| pattern.matches(t)) {
            let Some(postings) = self.terms.get(term) else {
                continue;
            };
            // A term may satisfy several clauses; each one contributes.
            let clause_hits = pattern.clause_hits(term) as f32;
            for (doc_idx, score) in postings {
                *combined_scores.entry(*doc_idx).or_insert(0.0) += score * clause_hits;
            }
        }

        if pattern.matches_all() {
            for doc_idx in 0..self.refs.len() {
                combined_scores.entry(doc_idx).or_insert(0.0);
            }
        }

        let mut results: Vec<_> = combined_scores.into_iter().collect();
        results.sort_by(|(a_idx, a), (b_idx, b)| b.total_cmp(a).then(a_idx.cmp(b_idx)));

        results
            .into_iter()
            .map(|(doc_idx, score)| IndexHit {
                reference: &self.refs[doc_idx],
                score,
            })
            .collect()
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.vocabulary.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.refs.len()
    }
}

/// Accumulates boosted term frequencies before idf finalization.
#[derive(Debug, Default)]
struct CategoryIndexBuilder {
    /// Flat map from (term, document index) to boosted term frequency
    term_docs: AHashMap<(String, usize), f32>,
    /// Map from item `id` to its document index
    doc_ids: AHashMap<String, usize>,
    refs: Vec<String>,
}

impl CategoryIndexBuilder {
    /// Adds an item's fields. A repeated `id` folds into the existing document.
    fn add(&mut self, item: &SearchIndexItem) {
        let doc_idx = match self.doc_ids.get(&item.id) {
            Some(&existing) => existing,
            None => {
                let doc_idx = self.refs.len();
                self.doc_ids.insert(item.id.clone(), doc_idx);
                self.refs.push(item.id.clone());
                doc_idx
            }
        };

        for field in [Field::Name, Field::Uri] {
            for token in tokenize(field.text(item)) {
                *self.term_docs.entry((token, doc_idx)).or_insert(0.0) += field.boost();
            }
        }
    }

    /// Applies idf = ln(1 + (N - df + 0.5) / (df + 0.5)), which stays positive
    /// even for terms present in every document.
    fn finalize(self) -> CategoryIndex {
        let start = std::time::Instant::now();
        let total_docs = self.refs.len() as f32;
        let total_pairs = self.term_docs.len();

        let mut grouped: AHashMap<String, Vec<(usize, f32)>> = AHashMap::new();
        for ((term, doc_idx), tf) in self.term_docs {
            grouped.entry(term).or_default().push((doc_idx, tf));
        }

        let terms: AHashMap<String, Vec<(usize, f32)>> = grouped
            .into_iter()
            .map(|(term, mut postings)| {
                let doc_freq = postings.len() as f32;
                let idf = (1.0 + (total_docs - doc_freq + 0.5) / (doc_freq + 0.5)).ln();
                for (_, score) in &mut postings {
                    *score *= idf;
                }
                postings.sort_by_key(|(doc_idx, _)| *doc_idx);
                (term, postings)
            })
            .collect();

        let mut vocabulary: Vec<String> = terms.keys().cloned().collect();
        vocabulary.sort_unstable();

        let index = CategoryIndex {
            terms,
            vocabulary,
            refs: self.refs,
        };

        tracing::debug!(
            "Built category index: {} unique terms, {} documents, {} term-document pairs in {:?}",
            index.term_count(),
            index.document_count(),
            total_pairs,
            start.elapsed()
        );

        index
    }
}
