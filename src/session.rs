//! A running search widget session.
//!
//! Wires the pieces together: the index loader fills the slot, the query engine
//! rebuilds from it, and every change to the debounced term or the filter state
//! triggers a full re-evaluation whose result set is published to subscribers.

use crate::config::SearchConfig;
use crate::debounce::Debouncer;
use crate::filter::{Filter, FilterController, FilterState};
use crate::loader::{IndexLoader, IndexSlot};
use crate::search::{QueryEngine, ResultSet};
use crate::types::SearchIndexSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// One search widget instance.
///
/// Must be created inside a tokio runtime. Dropping the session stops query
/// evaluation and cancels any pending debounced term; an in-flight index fetch
/// still runs to completion.
#[derive(Debug)]
pub struct SearchSession {
    term: Debouncer<String>,
    filters: FilterController,
    slot: IndexSlot,
    results: watch::Receiver<ResultSet>,
    cancel: CancellationToken,
}

impl SearchSession {
    /// Starts a session that loads the index from the configured source.
    pub fn start(config: &SearchConfig) -> Self {
        let slot = IndexSlot::new();
        IndexLoader::new(config.source(), slot.clone()).spawn();
        Self::with_slot(slot, config.debounce())
    }

    /// Starts a session over an existing slot, without loading anything.
    pub fn with_slot(slot: IndexSlot, debounce: Duration) -> Self {
        let term = Debouncer::new(String::new(), debounce);
        let filters = FilterController::new();
        // Subscribe before building so a fill racing with construction still wakes the evaluator.
        let snapshot = slot.subscribe();
        let mut engine = QueryEngine::new(slot.clone());
        let (results_tx, results) =
            watch::channel(engine.search(&term.current(), &filters.state()));
        let cancel = CancellationToken::new();

        let evaluator = Evaluator {
            term: term.subscribe(),
            filters: filters.subscribe(),
            snapshot,
            engine,
            results: results_tx,
        };
        tokio::spawn(evaluator.run(cancel.clone()));

        Self {
            term,
            filters,
            slot,
            results,
            cancel,
        }
    }

    /// Records a keystroke. Evaluation waits for the debounce window.
    pub fn set_term(&self, raw: impl Into<String>) {
        self.term.set(raw.into());
    }

    /// The term the current results were evaluated for.
    pub fn debounced_term(&self) -> String {
        self.term.current()
    }

    /// Changes a filter toggle. Evaluation runs immediately.
    pub fn toggle(&self, filter: Filter, enabled: bool) -> FilterState {
        self.filters.toggle(filter, enabled)
    }

    pub fn filters(&self) -> FilterState {
        self.filters.state()
    }

    pub const fn slot(&self) -> &IndexSlot {
        &self.slot
    }

    /// The latest published result set.
    pub fn results(&self) -> ResultSet {
        self.results.borrow().clone()
    }

    /// Observe published result sets.
    pub fn subscribe(&self) -> watch::Receiver<ResultSet> {
        self.results.clone()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Background task re-running the query engine on every input change.
struct Evaluator {
    term: watch::Receiver<String>,
    filters: watch::Receiver<FilterState>,
    snapshot: watch::Receiver<Option<Arc<SearchIndexSnapshot>>>,
    engine: QueryEngine,
    results: watch::Sender<ResultSet>,
}

impl Evaluator {
    async fn run(mut self, cancel: CancellationToken) {
        loop {
            let (changed, snapshot_changed) = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = self.snapshot.changed() => (changed, true),
                changed = self.term.changed() => (changed, false),
                changed = self.filters.changed() => (changed, false),
            };
            if changed.is_err() {
                break;
            }
            if snapshot_changed {
                tracing::debug!("Search index slot changed, re-evaluating");
            }
            self.evaluate();
        }

        tracing::debug!("Search session evaluator stopped");
    }

    /// Runs the engine against the latest term and filters and publishes the result.
    fn evaluate(&mut self) {
        let term = self.term.borrow_and_update().clone();
        let filters = *self.filters.borrow_and_update();
        let results = self.engine.search(&term, &filters);
        self.results.send_replace(results);
    }
}
