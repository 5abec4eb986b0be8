use rarefactor::api::{HttpBackend, SearchBackend};
use rarefactor::config::{ApiSettings, OutgoingSettings, SearchSettings, SuggestSettings};
use rarefactor::network::HttpClient;
use rarefactor::{FetchError, FetchErrorKind, SearchController, SearchState};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer, search_path: &str) -> HttpBackend {
    let api = ApiSettings {
        base_url: server.uri(),
        search_path: search_path.to_string(),
        ..Default::default()
    };
    let client = HttpClient::with_settings(&api, &OutgoingSettings::default()).unwrap();
    HttpBackend::new(client, &api, &SuggestSettings::default())
}

#[tokio::test]
async fn test_autocomplete_sends_query_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/autocomplete"))
        .and(query_param("q", "ca"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"suggestions": ["cat", "car"]})))
        .expect(1)
        .mount(&server)
        .await;

    let terms = backend(&server, "/search").autocomplete("ca").await.unwrap();
    assert_eq!(terms, vec!["cat", "car"]);
}

#[tokio::test]
async fn test_autocomplete_missing_field_is_empty() {
    let server = MockServer::start().await;
    Mock::given(path("/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let terms = assert_ok!(backend(&server, "/search").autocomplete("zz").await);
    assert!(terms.is_empty());
}

#[tokio::test]
async fn test_search_envelope_variants() {
    let server = MockServer::start().await;
    Mock::given(path("/v1/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"url": "https://rust-lang.org", "title": "Rust"}],
            "total": 1200
        })))
        .mount(&server)
        .await;

    let page = backend(&server, "/v1/search").search("rust").await.unwrap();
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title.as_deref(), Some("Rust"));
    assert!(page.results[0].snippet.is_none());
    assert_eq!(page.total_hits, Some(1200));
}

#[tokio::test]
async fn test_search_unknown_envelope_is_empty_page() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hits": {"count": 0}})))
        .mount(&server)
        .await;

    let page = backend(&server, "/search").search("x").await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_search_error_statuses_and_bodies() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .and(query_param("q", "down"))
        .respond_with(ResponseTemplate::new(503).set_body_string("{\"detail\": \"gRPC Channel not initialized\"}"))
        .mount(&server)
        .await;
    Mock::given(path("/search"))
        .and(query_param("q", "html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let backend = backend(&server, "/search");
    let err = assert_err!(backend.search("down").await);
    assert_eq!(err, FetchError::Status(503));
    assert_eq!(
        backend.search("html").await.unwrap_err().kind(),
        FetchErrorKind::Malformed
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let api = ApiSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };
    let client = HttpClient::with_settings(&api, &OutgoingSettings::default()).unwrap();
    let backend = HttpBackend::new(client, &api, &SuggestSettings::default());

    assert_eq!(
        backend.autocomplete("ca").await.unwrap_err().kind(),
        FetchErrorKind::Network
    );
}

#[tokio::test]
async fn test_controller_against_http_api() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .and(query_param("q", "cats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"url": "https://x", "title": "X", "snippet": "s", "score": 1.0}],
            "total_hits": 1
        })))
        .mount(&server)
        .await;

    let backend: Arc<dyn SearchBackend> = Arc::new(backend(&server, "/search"));
    let ctrl = SearchController::new(backend, &SearchSettings::default());
    let mut rx = ctrl.subscribe();

    assert!(ctrl.submit("cats"));
    let state = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_settled()))
        .await
        .unwrap()
        .unwrap()
        .clone();

    match state {
        SearchState::Success {
            query,
            results,
            total_hits,
        } => {
            assert_eq!(query, "cats");
            assert_eq!(
                results[0].to_json(),
                json!({"url": "https://x", "title": "X", "snippet": "s", "score": 1.0})
            );
            assert_eq!(total_hits, Some(1));
        }
        other => panic!("unexpected state {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_search_times_out() {
    let server = MockServer::start().await;
    Mock::given(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let backend: Arc<dyn SearchBackend> = Arc::new(backend(&server, "/search"));
    let ctrl = SearchController::new(backend, &SearchSettings { timeout: 0.2 });
    let mut rx = ctrl.subscribe();

    ctrl.submit("slow");
    let state = rx.wait_for(|s| s.is_settled()).await.unwrap().clone();
    match state {
        SearchState::Failed { kind, .. } => assert_eq!(kind, FetchErrorKind::Timeout),
        other => panic!("unexpected state {other:?}"),
    }
}
