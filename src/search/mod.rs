//! Category-scoped symbol search.
//!
//! This module provides the per-category inverted indices, wildcard query
//! normalization, and the query engine that resolves hits back to snapshot items.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{CategoryIndex, IndexHit, NAME_BOOST, URI_BOOST};
pub use query::{QueryEngine, ResultSet, WildcardPattern};
