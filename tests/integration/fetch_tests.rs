//! HTTP fetching against a mock server

use paste_trawler::config::{Config, FetchConfig};
use paste_trawler::discovery::{
    Coordinator, ErrorClass, ErrorClassifier, FetchError, Fetcher, HttpFetcher,
    ShutdownCoordinator, StopReason,
};
use paste_trawler::output::MemorySink;
use paste_trawler::state::ShutdownEvent;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(timeout_secs: u64) -> HttpFetcher {
    let config = FetchConfig {
        timeout_secs,
        user_agent: "trawler-test/1.0".to_string(),
        ..FetchConfig::default()
    };
    HttpFetcher::new(&config).unwrap()
}

#[tokio::test]
async fn test_get_returns_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/abcde/raw"))
        .and(header("user-agent", "trawler-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello paste"))
        .mount(&mock_server)
        .await;

    let outcome = fetcher(5)
        .get(&format!("{}/abcde/raw", mock_server.uri()))
        .await
        .unwrap();

    assert!(outcome.is_ok());
    assert_eq!(outcome.text(), "hello paste");
}

#[tokio::test]
async fn test_non_200_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let outcome = fetcher(5)
        .get(&format!("{}/zzzzz/raw", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(outcome.status, 404);
    assert!(!outcome.is_ok());
}

#[tokio::test]
async fn test_timeout_is_benign() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let error = fetcher(1)
        .get(&format!("{}/slow1/raw", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::Timeout { .. }));
    assert_eq!(
        ErrorClassifier::with_defaults().classify(&error),
        ErrorClass::Benign
    );
}

#[tokio::test]
async fn test_refused_connection_is_a_connect_error() {
    // Reserve a port, then release it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/abcde/raw", port);
    let error = fetcher(5).get(&url).await.unwrap_err();

    assert!(matches!(error, FetchError::Connect { .. }));
    assert_eq!(error.url(), url);
}

#[tokio::test]
async fn test_run_over_http_counts_pages_and_misses() {
    let mock_server = MockServer::start().await;

    // Identifiers starting with a digit exist; everything else is a miss
    Mock::given(method("GET"))
        .and(path_regex(r"^/[0-9][a-z0-9]{4}/raw$"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nothing to see here"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let mut config = Config::default();
    config.discovery.url_template = format!("{}/{{id}}/raw", mock_server.uri());
    config.discovery.tick_ms = 2;

    let sink = Arc::new(MemorySink::new());
    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::new(&config, sink.clone(), Arc::clone(&shutdown)).unwrap();

    let interrupter = Arc::clone(&shutdown);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        interrupter.handle(ShutdownEvent::Interrupt);
    });

    let report = tokio::time::timeout(Duration::from_secs(10), coordinator.run())
        .await
        .expect("run should drain")
        .unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert!(report.stats.launched > 0);
    assert_eq!(report.stats.completed, report.stats.launched);
    assert_eq!(
        report.stats.pages + report.stats.misses,
        report.stats.completed
    );
    assert!(sink.entries().is_empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len() as u64, report.stats.launched);
}
