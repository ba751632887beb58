//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by probes and service modules:
//! - Building the shared HTTP client with a fixed timeout
//! - Single GET requests with no retries
//! - Turning transport failures into typed, classifiable errors
//!
//! The `Fetcher` trait is the seam between discovery and the network, so
//! runs can be driven against canned responses with `StaticFetcher`.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Result of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// HTTP status code
    pub status: u16,

    /// Full response body
    pub body: Vec<u8>,
}

impl FetchOutcome {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for HTTP 200
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Transport-level failures
///
/// `detail` carries the underlying cause without the request URL, which is
/// what error classification matches against.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {detail}")]
    Connect { url: String, detail: String },

    #[error("reading body from {url} failed: {detail}")]
    Body { url: String, detail: String },

    #[error("request to {url} failed: {detail}")]
    Request { url: String, detail: String },
}

impl FetchError {
    /// The failure cause, free of the URL
    pub fn detail(&self) -> &str {
        match self {
            Self::Timeout { .. } => "operation timed out",
            Self::Connect { detail, .. } | Self::Body { detail, .. } | Self::Request { detail, .. } => {
                detail
            }
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }

    /// Classifies a reqwest error raised while sending a request
    fn from_send(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            return Self::Timeout { url };
        }
        let is_connect = error.is_connect();
        let detail = error_chain(&error.without_url());
        if is_connect {
            Self::Connect { url, detail }
        } else {
            Self::Request { url, detail }
        }
    }

    /// Classifies a reqwest error raised while reading a body
    fn from_body(url: &str, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Body {
            url,
            detail: error_chain(&error.without_url()),
        }
    }
}

/// Joins an error and all of its sources into one message
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Performs bounded-timeout HTTP GET requests
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and reads the complete body
    ///
    /// Any status code is a successful exchange; only transport failures
    /// are errors.
    async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError>;

    /// Called when rate limiting is suspected
    ///
    /// Reserved for switching proxy or connection; the default does nothing.
    fn rotate(&self) {}
}

/// Builds the shared HTTP client
///
/// # Example
///
/// ```no_run
/// use paste_trawler::config::FetchConfig;
/// use paste_trawler::discovery::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_send(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_body(url, e))?;

        Ok(FetchOutcome {
            status,
            body: body.to_vec(),
        })
    }
}

/// A canned reply served by `StaticFetcher`
#[derive(Debug, Clone)]
enum StaticReply {
    Page(FetchOutcome),
    Failure(String),
}

/// `Fetcher` that serves canned responses keyed by exact URL
///
/// Unknown URLs answer 404 with an empty body. Every requested URL is
/// recorded, in order.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    replies: HashMap<String, StaticReply>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with `status` for `url`
    pub fn page(mut self, url: impl Into<String>, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.replies
            .insert(url.into(), StaticReply::Page(FetchOutcome::new(status, body)));
        self
    }

    /// Fails requests to `url` with a transport error carrying `detail`
    pub fn failure(mut self, url: impl Into<String>, detail: impl Into<String>) -> Self {
        self.replies
            .insert(url.into(), StaticReply::Failure(detail.into()));
        self
    }

    /// URLs requested so far
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Fetcher for StaticFetcher {
    async fn get(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        match self.replies.get(url) {
            Some(StaticReply::Page(outcome)) => Ok(outcome.clone()),
            Some(StaticReply::Failure(detail)) => Err(FetchError::Request {
                url: url.to_string(),
                detail: detail.clone(),
            }),
            None => Ok(FetchOutcome::new(404, Vec::new())),
        }
    }
}
