mod common;

use assert2::{check, let_assert};
use common::{SAMPLE_INDEX, TempSite, serve_once, temp_site};
use doc_symbol_search::config::DEFAULT_INDEX_PATH;
use doc_symbol_search::{
    Category, Filter, IndexLoader, IndexSlot, IndexSource, LoadError, SearchConfig, SearchSession,
};
use rstest::rstest;
use std::time::Duration;

const INDEX_FILE: &str = "classes-functions-search-index.json";

fn http_config(base_url: String) -> SearchConfig {
    SearchConfig {
        base_url: Some(base_url),
        request_timeout_ms: 5_000,
        ..SearchConfig::default()
    }
}

// --- File source ---

#[rstest]
#[tokio::test]
async fn file_source_fills_slot(temp_site: TempSite) {
    temp_site.create_file(INDEX_FILE, SAMPLE_INDEX);
    let config = SearchConfig {
        local_root: Some(temp_site.path().to_path_buf()),
        ..SearchConfig::default()
    };

    let slot = IndexSlot::new();
    let loaded = IndexLoader::new(config.source(), slot.clone()).run().await;

    let_assert!(Some(snapshot) = loaded);
    check!(snapshot.item_count() == 6);
    check!(slot.is_ready());
}

#[rstest]
#[tokio::test]
async fn malformed_file_leaves_slot_empty(temp_site: TempSite) {
    let path = temp_site.create_file(INDEX_FILE, r#"{"classes": [{"id": 1}]"#);
    let source = IndexSource::File(path);

    let_assert!(Err(LoadError::Parse { .. }) = source.fetch().await);

    let slot = IndexSlot::new();
    check!(IndexLoader::new(source, slot.clone()).run().await.is_none());
    check!(!slot.is_ready());
}

#[rstest]
#[tokio::test]
async fn missing_file_is_io_error(temp_site: TempSite) {
    let source = IndexSource::File(temp_site.path().join(INDEX_FILE));
    let_assert!(Err(LoadError::Io { path, .. }) = source.fetch().await);
    check!(path.ends_with(INDEX_FILE));
}

// --- HTTP source ---

#[tokio::test(flavor = "multi_thread")]
async fn http_source_fills_slot() {
    let base_url = serve_once("200 OK", SAMPLE_INDEX.to_string()).await;
    let config = http_config(base_url);

    let slot = IndexSlot::new();
    let handle = IndexLoader::new(config.source(), slot.clone()).spawn();
    let loaded = handle.await.unwrap();

    check!(loaded.is_some());
    let snapshot = slot.get().unwrap();
    check!(snapshot.items("classes").unwrap().len() == 3);
    check!(snapshot.items("functions").unwrap()[1].name == "connect");
}

#[tokio::test(flavor = "multi_thread")]
async fn http_error_status_leaves_slot_empty() {
    let base_url = serve_once("404 Not Found", String::new()).await;
    let source = http_config(base_url).source();

    let_assert!(Err(LoadError::Status { status, url }) = source.fetch().await);
    check!(status == 404);
    check!(url.ends_with(DEFAULT_INDEX_PATH));
}

#[tokio::test(flavor = "multi_thread")]
async fn http_malformed_payload_is_parse_error() {
    let base_url = serve_once("200 OK", "<html>not json</html>".to_string()).await;
    let slot = IndexSlot::new();
    let loader = IndexLoader::new(http_config(base_url).source(), slot.clone());

    check!(loader.run().await.is_none());
    check!(!slot.is_ready());
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_request_error() {
    // Bind and immediately drop a listener to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = http_config(format!("http://{}", addr)).source();
    let_assert!(Err(LoadError::Request { .. }) = source.fetch().await);
}

// --- Session over a loaded site ---

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_loads_and_searches(temp_site: TempSite) {
    temp_site.create_file(INDEX_FILE, SAMPLE_INDEX);
    let config = SearchConfig {
        local_root: Some(temp_site.path().to_path_buf()),
        debounce_ms: 20,
        ..SearchConfig::default()
    };

    let session = SearchSession::start(&config);
    let ready = tokio::time::timeout(Duration::from_secs(5), session.slot().ready()).await;
    check!(ready.is_ok(), "Index should load from the temp site");

    let mut results = session.subscribe();
    session.toggle(Filter::Category(Category::Classes), true);
    session.set_term("client");

    let found = tokio::time::timeout(
        Duration::from_secs(5),
        results.wait_for(|items| items.len() == 1 && items[0].id == "class-httpclient"),
    )
    .await
    .map(|seen| seen.is_ok());
    check!(found == Ok(true), "Session should publish the HttpClient match");
    check!(session.debounced_term() == "client");
}
