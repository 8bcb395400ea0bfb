//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `sample_slot`: an [`IndexSlot`] already filled with [`SAMPLE_INDEX`]
//! - `temp_site`: an empty [`TempSite`] for file-source loader tests
//!
//! [`serve_once`] stands in for the static file server when testing the HTTP source.

use doc_symbol_search::{IndexSlot, SearchIndexSnapshot};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Index document with two categories, as written by the documentation build.
#[allow(dead_code)] // Used across different integration test crates
pub const SAMPLE_INDEX: &str = r#"{
    "classes": [
        {"id": "class-widget", "name": "Widget", "uri": "api/widgets.html"},
        {"id": "class-httpclient", "name": "HttpClient", "uri": "api/http.html"},
        {"id": "class-renderer", "name": "Renderer", "uri": "api/render.html"}
    ],
    "functions": [
        {"id": "function-renderwidget", "name": "renderWidget", "uri": "api/render.html"},
        {"id": "function-connect", "name": "connect", "uri": "api/http.html"},
        {"id": "function-make_client", "name": "make_client", "uri": "api/http.html"}
    ]
}"#;

#[allow(dead_code)] // Used across different integration test crates
pub fn sample_snapshot() -> SearchIndexSnapshot {
    SearchIndexSnapshot::from_json(SAMPLE_INDEX.as_bytes()).expect("Sample index should parse")
}

/// An [`IndexSlot`] filled with the sample index.
#[fixture]
#[allow(dead_code)] // Used across different integration test crates
pub fn sample_slot() -> IndexSlot {
    doc_symbol_search::logging::init_for_tests();
    let slot = IndexSlot::new();
    slot.fill(sample_snapshot());
    slot
}

/// A temporary built-site directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempSite {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempSite {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this site.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this site.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }
}

impl Default for TempSite {
    fn default() -> Self {
        Self::new()
    }
}

#[fixture]
#[allow(dead_code)] // Used across different integration test crates
pub fn temp_site() -> TempSite {
    doc_symbol_search::logging::init_for_tests();
    TempSite::new()
}

/// Serves a single HTTP response on a local port and returns the base URL.
///
/// The server answers exactly one request, whatever its path, then closes.
#[allow(dead_code)] // Used across different integration test crates
pub async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");

    tokio::spawn(async move {
        let Ok((mut stream, _)) = listener.accept().await else {
            return;
        };

        // Read until the end of the request headers; GET has no body.
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });

    format!("http://{}", addr)
}
