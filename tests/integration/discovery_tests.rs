//! Discovery runs: drain, forced exit, and rate-limit self-stop

use crate::support::{
    fast_config, FailingFetcher, HangingFetcher, PasteSite, SlowFetcher, PASTE_PREFIX,
};
use paste_trawler::discovery::{Coordinator, Fetcher, ShutdownCoordinator, StaticFetcher, StopReason};
use paste_trawler::output::{JsonLinesSink, MemorySink, ResultSink};
use paste_trawler::state::{ShutdownEvent, ShutdownState};
use paste_trawler::Entry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

const RUN_LIMIT: Duration = Duration::from_secs(10);

/// Sends one interrupt after `delay`
fn interrupt_after(shutdown: &Arc<ShutdownCoordinator>, delay: Duration) {
    let shutdown = Arc::clone(shutdown);
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        shutdown.handle(ShutdownEvent::Interrupt);
    });
}

#[tokio::test]
async fn test_drain_waits_for_fast_and_slow_probes() {
    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &fast_config(),
        Arc::new(SlowFetcher::new(
            Duration::from_millis(2),
            Duration::from_millis(150),
        )),
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();
    let stats = coordinator.stats();

    interrupt_after(&shutdown, Duration::from_millis(60));
    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("run should drain")
        .unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert_eq!(report.state, ShutdownState::Terminated);
    assert_eq!(report.exit_code(), 0);
    assert!(report.stats.launched > 1);
    assert_eq!(report.stats.completed, report.stats.launched);
    assert_eq!(report.stats.misses, report.stats.launched);

    // Nothing completes after the report
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(stats.snapshot().completed, report.stats.completed);
}

#[tokio::test]
async fn test_second_interrupt_forces_without_waiting_for_drain() {
    let forced = Arc::new(AtomicBool::new(false));
    let observed = Arc::clone(&forced);
    let shutdown = Arc::new(ShutdownCoordinator::new(move || {
        observed.store(true, Ordering::SeqCst);
    }));

    let coordinator = Coordinator::with_fetcher(
        &fast_config(),
        Arc::new(HangingFetcher),
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();
    let run = tokio::spawn(coordinator.run());

    let (signals, rx) = mpsc::channel(4);
    let listener = Arc::clone(&shutdown).listen(rx);

    tokio::time::sleep(Duration::from_millis(30)).await;
    signals.send(()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(shutdown.state(), ShutdownState::Draining);
    assert!(!forced.load(Ordering::SeqCst));

    signals.send(()).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), listener)
        .await
        .expect("listener should stop after forcing")
        .unwrap();

    assert!(forced.load(Ordering::SeqCst));
    assert_eq!(shutdown.state(), ShutdownState::ForceKilled);
    assert_eq!(shutdown.state().exit_code(), Some(2));

    // The drain is still blocked on hanging probes
    assert!(!run.is_finished());
    run.abort();
}

#[tokio::test]
async fn test_single_unknown_error_stops_discovery() {
    let fetcher = Arc::new(FailingFetcher::new(5, "upstream answered with a challenge page"));
    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &fast_config(),
        Arc::clone(&fetcher) as Arc<dyn Fetcher>,
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();

    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("rate-limit suspicion should stop the run")
        .unwrap();

    assert_eq!(report.reason, StopReason::RateLimited);
    assert_eq!(report.state, ShutdownState::Terminated);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.stats.benign, 5);
    assert!(report.stats.suspicious >= 1);
    assert_eq!(report.stats.completed, report.stats.launched);
    assert_eq!(fetcher.rotations(), 1);
}

#[tokio::test]
async fn test_benign_errors_never_stop_discovery() {
    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &fast_config(),
        Arc::new(FailingFetcher::new(usize::MAX, "unused")),
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();

    interrupt_after(&shutdown, Duration::from_millis(60));
    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("run should drain")
        .unwrap();

    assert_eq!(report.reason, StopReason::Cancelled);
    assert_eq!(report.stats.suspicious, 0);
    assert!(report.stats.benign > 0);
    assert_eq!(report.stats.benign, report.stats.completed);
}

#[tokio::test]
async fn test_suspicion_threshold_tolerates_earlier_errors() {
    let mut config = fast_config();
    config.classifier.suspicion_threshold = 3;

    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &config,
        Arc::new(FailingFetcher::new(0, "HTTP/1.1 429 Too Many Requests")),
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();

    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("run should stop")
        .unwrap();

    assert_eq!(report.reason, StopReason::RateLimited);
    assert!(report.stats.suspicious >= 3);
}

#[tokio::test]
async fn test_max_in_flight_bounds_launches() {
    let mut config = fast_config();
    config.discovery.max_in_flight = 2;

    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &config,
        Arc::new(SlowFetcher::new(
            Duration::from_millis(400),
            Duration::from_millis(400),
        )),
        Arc::new(MemorySink::new()),
        Arc::clone(&shutdown),
    )
    .unwrap();

    interrupt_after(&shutdown, Duration::from_millis(80));
    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("run should drain")
        .unwrap();

    assert_eq!(report.stats.launched, 2);
    assert_eq!(report.stats.completed, 2);
}

#[tokio::test]
async fn test_live_links_reach_json_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");

    let fetcher = PasteSite {
        paste: "my clip: https://sendvid.com/abcd1234 (old: https://sendvid.com/zzzz9999)"
            .to_string(),
        links: StaticFetcher::new().page(
            "https://sendvid.com/abcd1234",
            200,
            "<html><head><title>my clip</title></head></html>",
        ),
    };
    let sink = Arc::new(JsonLinesSink::open(&path).unwrap());
    let shutdown = Arc::new(ShutdownCoordinator::new(|| {}));
    let coordinator = Coordinator::with_fetcher(
        &fast_config(),
        Arc::new(fetcher),
        Arc::clone(&sink) as Arc<dyn ResultSink>,
        Arc::clone(&shutdown),
    )
    .unwrap();

    interrupt_after(&shutdown, Duration::from_millis(50));
    let report = tokio::time::timeout(RUN_LIMIT, coordinator.run())
        .await
        .expect("run should drain")
        .unwrap();

    assert!(report.stats.pages > 0);
    // One live link per paste; the dead one is filtered
    assert_eq!(report.stats.delivered, report.stats.pages);
    assert_eq!(report.stats.dropped, 0);

    let contents = std::fs::read_to_string(&path).unwrap();
    let entries: Vec<Entry> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(entries.len() as u64, report.stats.delivered);
    for entry in &entries {
        assert_eq!(entry.service, "Sendvid");
        assert_eq!(entry.link, "https://sendvid.com/abcd1234");
        assert_eq!(entry.title.as_deref(), Some("my clip"));
        assert!(entry.source.starts_with(PASTE_PREFIX));
    }
}
