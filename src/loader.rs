//! Loading the static symbol index into a shared, write-once slot.
//!
//! The loader performs a single fetch per session. On failure the slot stays
//! empty for good and every query downstream degrades to no results.

use crate::error::LoadError;
use crate::types::SearchIndexSnapshot;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Where the index document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// `GET` the document from a served documentation site
    Http { url: String, timeout: Duration },
    /// Read the document from a built site on disk
    File(PathBuf),
}

impl IndexSource {
    /// Fetches and parses the index document.
    pub async fn fetch(&self) -> Result<SearchIndexSnapshot, LoadError> {
        match self {
            Self::Http { url, timeout } => fetch_http(url, *timeout).await,
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?;
                SearchIndexSnapshot::from_json(&bytes).map_err(|source| LoadError::Parse {
                    origin: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

async fn fetch_http(url: &str, timeout: Duration) -> Result<SearchIndexSnapshot, LoadError> {
    let request_error = |source| LoadError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(request_error)?;
    let response = client.get(url).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(request_error)?;
    SearchIndexSnapshot::from_json(&bytes).map_err(|source| LoadError::Parse {
        origin: url.to_string(),
        source,
    })
}

/// Shared read-only view of the loaded snapshot, initially empty.
///
/// Clones share the same slot. It can be filled once; later fills are ignored.
#[derive(Debug, Clone)]
pub struct IndexSlot {
    inner: Arc<watch::Sender<Option<Arc<SearchIndexSnapshot>>>>,
}

impl Default for IndexSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexSlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            inner: Arc::new(tx),
        }
    }

    /// The loaded snapshot, or `None` while the index is not ready.
    pub fn get(&self) -> Option<Arc<SearchIndexSnapshot>> {
        self.inner.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Stores the snapshot if the slot is still empty.
    ///
    /// Returns the snapshot now held by the slot and whether this call filled it.
    pub fn fill(&self, snapshot: SearchIndexSnapshot) -> (Arc<SearchIndexSnapshot>, bool) {
        let snapshot = Arc::new(snapshot);
        let mut held = Arc::clone(&snapshot);
        let filled = self.inner.send_if_modified(|slot| match slot {
            Some(existing) => {
                held = Arc::clone(existing);
                false
            }
            None => {
                *slot = Some(snapshot);
                true
            }
        });
        (held, filled)
    }

    /// Observe the slot; the receiver wakes when the snapshot arrives.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<SearchIndexSnapshot>>> {
        self.inner.subscribe()
    }

    /// Waits until the slot is filled.
    ///
    /// Never completes if the load failed; callers that cannot wait forever
    /// should wrap this in a timeout.
    pub async fn ready(&self) -> Arc<SearchIndexSnapshot> {
        let mut rx = self.subscribe();
        loop {
            if let Some(snapshot) = rx.borrow_and_update().clone() {
                return snapshot;
            }
            // The sender lives as long as `self`, so this cannot fail.
            let _ = rx.changed().await;
        }
    }
}

/// Performs the single index fetch of a session and publishes the result.
#[derive(Debug)]
pub struct IndexLoader {
    source: IndexSource,
    slot: IndexSlot,
}

impl IndexLoader {
    pub const fn new(source: IndexSource, slot: IndexSlot) -> Self {
        Self { source, slot }
    }

    /// Fetches the index once and fills the slot.
    ///
    /// Failures are logged and leave the slot empty; they are never retried.
    pub async fn run(self) -> Option<Arc<SearchIndexSnapshot>> {
        let start = std::time::Instant::now();
        tracing::info!("Loading search index from {:?}", self.source);

        match self.source.fetch().await {
            Ok(snapshot) => {
                let items = snapshot.item_count();
                let categories = snapshot.category_count();
                let (snapshot, filled) = self.slot.fill(snapshot);
                if filled {
                    tracing::info!(
                        "Loaded search index: {} categories, {} items in {:?}",
                        categories,
                        items,
                        start.elapsed()
                    );
                } else {
                    tracing::debug!("Search index slot already filled, keeping existing snapshot");
                }
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("Search index unavailable for this session: {}", e);
                None
            }
        }
    }

    /// Runs the loader as a background task.
    pub fn spawn(self) -> tokio::task::JoinHandle<Option<Arc<SearchIndexSnapshot>>> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchIndexItem;
    use assert2::check;

    fn snapshot(name: &str) -> SearchIndexSnapshot {
        [("classes", vec![SearchIndexItem::new("c1", name, "/c1")])]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_slot_starts_empty() {
        let slot = IndexSlot::new();
        check!(!slot.is_ready());
        check!(slot.get().is_none());
    }

    #[test]
    fn test_slot_fills_once() {
        let slot = IndexSlot::new();
        let observer = slot.clone();

        let (first, filled) = slot.fill(snapshot("First"));
        check!(filled);
        check!(observer.is_ready());

        let (held, filled) = slot.fill(snapshot("Second"));
        check!(!filled);
        check!(Arc::ptr_eq(&first, &held));
        check!(observer.get().unwrap().items("classes").unwrap()[0].name == "First");
    }

    #[tokio::test]
    async fn test_subscribers_see_fill() {
        let slot = IndexSlot::new();
        let mut rx = slot.subscribe();

        slot.fill(snapshot("Widget"));
        check!(rx.changed().await.is_ok());
        check!(rx.borrow().is_some());
        check!(slot.ready().await.item_count() == 1);
    }
}
