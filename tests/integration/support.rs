//! Shared fetchers and helpers

use async_trait::async_trait;
use paste_trawler::config::Config;
use paste_trawler::discovery::{FetchError, FetchOutcome, Fetcher, StaticFetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Template every scripted run probes
pub const PASTE_TEMPLATE: &str = "https://paste.test/{id}/raw";

/// Prefix shared by every generated candidate URL
pub const PASTE_PREFIX: &str = "https://paste.test/";

/// A config that launches quickly
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.discovery.url_template = PASTE_TEMPLATE.to_string();
    config.discovery.tick_ms = 1;
    config
}

/// Serves `paste` for every candidate URL and defers other URLs to `links`
pub struct PasteSite {
    pub paste: String,
    pub links: StaticFetcher,
}

#[async_trait]
impl Fetcher for PasteSite {
    async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        if url.starts_with(PASTE_PREFIX) {
            Ok(FetchOutcome::new(200, self.paste.clone()))
        } else {
            self.links.get(url).await
        }
    }
}

/// Answers every request with 404 after a delay chosen from the request order
///
/// Odd-numbered requests are fast, even-numbered ones take `slow`.
pub struct SlowFetcher {
    pub fast: Duration,
    pub slow: Duration,
    calls: AtomicUsize,
}

impl SlowFetcher {
    pub fn new(fast: Duration, slow: Duration) -> Self {
        Self {
            fast,
            slow,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Fetcher for SlowFetcher {
    async fn get(&self, _url: &str) -> Result<FetchOutcome, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = if call % 2 == 0 { self.fast } else { self.slow };
        tokio::time::sleep(delay).await;
        Ok(FetchOutcome::new(404, Vec::new()))
    }
}

/// Fails every request; the first `benign` calls with a benign message,
/// later calls with `unknown`
pub struct FailingFetcher {
    pub benign: usize,
    pub unknown: String,
    calls: AtomicUsize,
    rotations: AtomicUsize,
}

impl FailingFetcher {
    pub fn new(benign: usize, unknown: impl Into<String>) -> Self {
        Self {
            benign,
            unknown: unknown.into(),
            calls: AtomicUsize::new(0),
            rotations: AtomicUsize::new(0),
        }
    }

    pub fn rotations(&self) -> usize {
        self.rotations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FailingFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let detail = if call < self.benign {
            "connection reset by peer".to_string()
        } else {
            self.unknown.clone()
        };
        Err(FetchError::Request {
            url: url.to_string(),
            detail,
        })
    }

    fn rotate(&self) {
        self.rotations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Never answers within a test's lifetime
pub struct HangingFetcher;

#[async_trait]
impl Fetcher for HangingFetcher {
    async fn get(&self, _url: &str) -> Result<FetchOutcome, FetchError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(FetchOutcome::new(404, Vec::new()))
    }
}
