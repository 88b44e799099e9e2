use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use mushaf::core::model::{Position, SettingName, Theme};
use mushaf::core::navigation::{NavError, NavOptions, NavigationState, Outcome};
use mushaf::core::persist::{FileStore, MemoryStore, SessionPersistence};
use mushaf::import::seed_files;
use mushaf::store::{HttpPageStore, StoreError};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn page_json(n: u32) -> serde_json::Value {
    json!({
        "pageNumber": n,
        "juz": 1,
        "surahNumber": 2,
        "surahName": "Al-Baqarah",
        "ayat": [
            {"ayahNumber": 1, "english": format!("page {} first", n)},
            {"ayahNumber": 2, "english": format!("page {} second", n)}
        ]
    })
}

async fn mount_page(server: &MockServer, n: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/pages/{}", n)))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Serves `/meta` with `count` pages and every page in `served`.
async fn corpus_server(count: u32, served: &[u32]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/meta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pageCount": count})))
        .mount(&server)
        .await;
    for n in served {
        mount_page(&server, *n, ResponseTemplate::new(200).set_body_json(page_json(*n))).await;
    }
    server
}

fn http_store(server: &MockServer) -> Arc<HttpPageStore> {
    Arc::new(HttpPageStore::new(server.uri(), None, Duration::from_secs(5)).unwrap())
}

async fn open(server: &MockServer, memory: &MemoryStore) -> NavigationState {
    NavigationState::open(
        http_store(server),
        SessionPersistence::new(Box::new(memory.clone())),
        NavOptions::default(),
    )
    .await
    .unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mushaf-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ============================================================================
// Reading over HTTP
// ============================================================================

#[tokio::test]
async fn test_read_across_pages_and_resume() {
    let server = corpus_server(2, &[1, 2]).await;
    let memory = MemoryStore::new();

    let mut nav = open(&server, &memory).await;
    assert_eq!(nav.total_pages(), 2);
    assert_eq!(nav.position(), Position::START);

    assert_eq!(nav.step_forward().await.unwrap(), Outcome::Moved);
    assert_eq!(nav.step_forward().await.unwrap(), Outcome::Moved);
    assert_eq!(nav.position(), Position::new(1, 0));
    assert_eq!(nav.current_ayah().english, "page 2 first");

    assert_eq!(nav.step_forward().await.unwrap(), Outcome::Moved);
    assert_eq!(nav.step_forward().await.unwrap(), Outcome::Unchanged);
    assert!(nav.at_end());
    nav.toggle_bookmark();
    nav.toggle_setting(SettingName::Theme);
    drop(nav);

    let nav = open(&server, &memory).await;
    assert_eq!(nav.position(), Position::new(1, 1));
    assert_eq!(nav.page().page_number, 2);
    assert!(nav.is_bookmarked());
    assert_eq!(nav.settings().theme, Theme::Day);
}

#[tokio::test]
async fn test_step_back_lands_on_last_ayah() {
    let server = corpus_server(2, &[1, 2]).await;
    let memory = MemoryStore::new();
    let mut nav = open(&server, &memory).await;

    nav.jump_to_page(2).await.unwrap();
    assert_eq!(nav.step_backward().await.unwrap(), Outcome::Moved);
    assert_eq!(nav.position(), Position::new(0, 1));
    assert_eq!(nav.step_backward().await.unwrap(), Outcome::Moved);
    assert_eq!(nav.step_backward().await.unwrap(), Outcome::Unchanged);
    assert!(nav.at_start());
}

#[tokio::test]
async fn test_missing_page_keeps_position() {
    let server = corpus_server(3, &[1]).await;
    mount_page(&server, 2, ResponseTemplate::new(404)).await;
    let memory = MemoryStore::new();
    let mut nav = open(&server, &memory).await;

    let outcome = nav.jump_to_page(2).await.unwrap();
    assert_eq!(outcome, Outcome::Missing { page_number: 2 });
    assert_eq!(nav.position(), Position::START);
    assert_eq!(nav.page().page_number, 1);
}

#[tokio::test]
async fn test_store_failure_keeps_position() {
    let server = corpus_server(3, &[1]).await;
    mount_page(&server, 2, ResponseTemplate::new(503)).await;
    let memory = MemoryStore::new();
    let mut nav = open(&server, &memory).await;
    nav.step_forward().await.unwrap();

    match nav.step_forward().await {
        Err(NavError::Store(e)) => {
            assert!(matches!(e, StoreError::Api { status: 503, .. }));
            assert!(e.is_retryable());
        }
        other => panic!("expected store error, got {:?}", other),
    }
    assert_eq!(nav.position(), Position::new(0, 1));
}

#[tokio::test]
async fn test_mismatched_page_number_keeps_position() {
    let server = corpus_server(3, &[1]).await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_json(page_json(7))).await;
    let memory = MemoryStore::new();
    let mut nav = open(&server, &memory).await;

    let result = nav.jump_to_page(2).await;
    assert!(matches!(result, Err(NavError::Store(StoreError::Parse(_)))));
    assert_eq!(nav.position(), Position::START);
    assert_eq!(nav.page().page_number, 1);
}

#[tokio::test]
async fn test_jump_is_clamped_to_page_count() {
    let server = corpus_server(2, &[1, 2]).await;
    let memory = MemoryStore::new();
    let mut nav = open(&server, &memory).await;

    nav.jump_to_page(9_999).await.unwrap();
    assert_eq!(nav.page().page_number, 2);
    nav.jump_to_page(-4).await.unwrap();
    assert_eq!(nav.page().page_number, 1);
}

#[tokio::test]
async fn test_missing_meta_uses_fallback_count() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(page_json(1))).await;
    let memory = MemoryStore::new();

    let nav = open(&server, &memory).await;
    assert_eq!(nav.total_pages(), 604);
}

#[tokio::test]
async fn test_open_fails_without_first_page() {
    let server = corpus_server(2, &[]).await;
    mount_page(&server, 1, ResponseTemplate::new(404)).await;

    let result = NavigationState::open(
        http_store(&server),
        SessionPersistence::new(Box::new(MemoryStore::new())),
        NavOptions::default(),
    )
    .await;
    assert!(matches!(result, Err(NavError::NoPages)));
}

// ============================================================================
// File Persistence
// ============================================================================

#[tokio::test]
async fn test_session_survives_restart_on_disk() {
    let server = corpus_server(2, &[1, 2]).await;
    let dir = temp_dir("session");

    let persistence = SessionPersistence::new(Box::new(FileStore::new(dir.clone())));
    let mut nav = NavigationState::open(http_store(&server), persistence, NavOptions::default())
        .await
        .unwrap();
    nav.jump_to_page(2).await.unwrap();
    nav.toggle_setting(SettingName::Arabic);
    drop(nav);

    assert!(dir.join("quran-learning-session.json").exists());

    let persistence = SessionPersistence::new(Box::new(FileStore::new(dir.clone())));
    let nav = NavigationState::open(http_store(&server), persistence, NavOptions::default())
        .await
        .unwrap();
    assert_eq!(nav.position(), Position::new(1, 0));
    assert!(!nav.settings().show_arabic);

    let _ = std::fs::remove_dir_all(&dir);
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn test_seed_file_into_http_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages:batchWrite"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = temp_dir("seed");
    let file = dir.join("pages.json");
    let pages = json!([page_json(1), page_json(2), {"pageNumber": 3}]);
    std::fs::write(&file, pages.to_string()).unwrap();

    let store = http_store(&server);
    let stats = seed_files(store.as_ref(), &[file]).await.unwrap();
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.written, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.batches, 1);

    let _ = std::fs::remove_dir_all(&dir);
}
