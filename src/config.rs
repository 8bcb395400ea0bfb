//! Search widget configuration.

use crate::error::Result;
use crate::loader::IndexSource;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Well-known path of the symbol index produced by the documentation build.
pub const DEFAULT_INDEX_PATH: &str = "/classes-functions-search-index.json";

/// Default quiet period before a typed term is evaluated.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration for a search session.
///
/// Every field has a default, so an empty TOML document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Resource path of the index document
    pub index_path: String,
    /// Origin serving the documentation site (e.g. `http://localhost:8000`)
    pub base_url: Option<String>,
    /// Directory holding the built site, used when no `base_url` is set
    pub local_root: Option<PathBuf>,
    /// Debounce window for the search term, in milliseconds
    pub debounce_ms: u64,
    /// Timeout for the index request, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_path: DEFAULT_INDEX_PATH.to_string(),
            base_url: None,
            local_root: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl SearchConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse search config")
    }

    /// Load a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Where the index should be loaded from.
    ///
    /// A `base_url` wins over `local_root`; with neither, the index path is
    /// read relative to the current directory.
    pub fn source(&self) -> IndexSource {
        if let Some(base) = &self.base_url {
            let url = format!(
                "{}/{}",
                base.trim_end_matches('/'),
                self.index_path.trim_start_matches('/')
            );
            return IndexSource::Http {
                url,
                timeout: self.request_timeout(),
            };
        }

        let root = self.local_root.clone().unwrap_or_else(|| PathBuf::from("."));
        IndexSource::File(root.join(self.index_path.trim_start_matches('/')))
    }
}
