//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for configuration and setup code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when fetching or parsing the symbol index fails.
///
/// None of these are fatal: the loader logs them and leaves the index slot empty.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The HTTP request could not be completed.
    #[error("Failed to fetch search index from {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("Search index request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The local index file could not be read.
    #[error("Failed to read search index at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The payload is not a valid index document.
    #[error("Malformed search index from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}
