//! Log output for embedders and tests.
//!
//! The library only emits `tracing` events. Installing a subscriber is up to
//! the embedder; these helpers cover the common cases.

use std::sync::Once;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

static INSTALL: Once = Once::new();

/// Event filter: `RUST_LOG` when set, otherwise this crate at `level` and
/// dependencies (reqwest, hyper) at warn.
pub fn filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,doc_symbol_search={}", level)))
}

/// Installs a compact stderr subscriber at info level. Safe to call multiple times.
pub fn init() {
    INSTALL.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter(LevelFilter::INFO))
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .compact()
            .try_init();
        if let Err(e) = installed {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

/// Like [`init`], but at debug level and captured by the test harness.
pub fn init_for_tests() {
    INSTALL.call_once(|| {
        // Another test binary helper may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter(LevelFilter::DEBUG))
            .with_test_writer()
            .with_ansi(false)
            .compact()
            .try_init();
    });
}
