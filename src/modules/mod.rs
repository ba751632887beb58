//! Service modules: per-host link extraction, validation, and enrichment
//!
//! Every module implements `ServiceModule`. A module only knows its own
//! host's link shapes and markup; the `ModuleRegistry` runs all enabled
//! modules over each fetched paste and concatenates what they return.
//!
//! # Components
//!
//! - `markup`: Title/meta/regex helpers
//! - One file per supported service

pub mod bunkr;
pub mod cloudmailru;
pub mod cyberdrop;
pub mod dood;
pub mod gofile;
pub mod googledrive;
pub mod markup;
pub mod mega;
pub mod sendvid;

use crate::discovery::{FetchError, Fetcher};
use crate::entry::Entry;
use crate::ConfigError;
use async_trait::async_trait;
use thiserror::Error;

pub use bunkr::Bunkr;
pub use cloudmailru::CloudMailRu;
pub use cyberdrop::Cyberdrop;
pub use dood::Dood;
pub use gofile::GoFile;
pub use googledrive::GoogleDrive;
pub use mega::Mega;
pub use sendvid::Sendvid;

/// Configuration names of every module, in default fan-out order
pub const MODULE_NAMES: &[&str] = &[
    "mega",
    "gofile",
    "sendvid",
    "cyberdrop",
    "bunkr",
    "googledrive",
    "dood",
    "cloudmailru",
];

/// Per-link failures inside a module
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{service} returned status {status} for {link}")]
    Status {
        service: &'static str,
        link: String,
        status: u16,
    },

    #[error("{service} page for {link} is malformed: {reason}")]
    Malformed {
        service: &'static str,
        link: String,
        reason: String,
    },
}

/// Result of validating one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    /// The link is gone or never existed
    Dead,

    /// The link is live; `page` holds the body fetched while validating, if any
    Live { page: Option<String> },
}

impl Liveness {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live { .. })
    }
}

/// The extract / validate / enrich contract every service implements
#[async_trait]
pub trait ServiceModule: Send + Sync {
    /// Configuration name, e.g. `gofile`
    fn name(&self) -> &'static str;

    /// Display name stored in `Entry::service`, e.g. `GoFile`
    fn service(&self) -> &'static str;

    /// Finds candidate links in a paste body. Performs no I/O.
    fn extract(&self, text: &str) -> Vec<String>;

    /// Checks one link with a single request
    async fn validate(&self, fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError>;

    /// Builds the entry for a live link
    ///
    /// `page` is the body fetched by `validate`, when it fetched the link
    /// itself. Fields that cannot be extracted stay empty.
    async fn enrich(
        &self,
        fetcher: &dyn Fetcher,
        link: &str,
        page: Option<&str>,
        source: &str,
    ) -> Result<Entry, ModuleError>;

    /// Extracts, validates, and enriches every link in `text`
    ///
    /// A failure on one link is logged and skipped; the remaining links are
    /// still processed.
    async fn delegate(&self, fetcher: &dyn Fetcher, text: &str, source: &str) -> Vec<Entry> {
        let mut entries = Vec::new();

        for link in self.extract(text) {
            let liveness = match self.validate(fetcher, &link).await {
                Ok(liveness) => liveness,
                Err(e) => {
                    tracing::debug!("{}: validation of {} failed: {}", self.service(), link, e);
                    continue;
                }
            };

            let page = match liveness {
                Liveness::Live { page } => page,
                Liveness::Dead => {
                    tracing::trace!("{}: {} is dead", self.service(), link);
                    continue;
                }
            };

            match self.enrich(fetcher, &link, page.as_deref(), source).await {
                Ok(entry) => {
                    tracing::info!("{}: {}", self.service(), link);
                    entries.push(entry);
                }
                Err(e) => {
                    tracing::warn!("{}: enrichment of {} failed: {}", self.service(), link, e);
                }
            }
        }

        entries
    }
}

/// Fetches `link` and returns its body regardless of status
pub(crate) async fn fetch_page(fetcher: &dyn Fetcher, link: &str) -> Result<String, ModuleError> {
    Ok(fetcher.get(link).await?.text())
}

/// Fetches `link`, treating HTTP 200 as live and keeping the body
pub(crate) async fn validate_ok(fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError> {
    let response = fetcher.get(link).await?;
    if response.is_ok() {
        Ok(Liveness::Live {
            page: Some(response.text()),
        })
    } else {
        Ok(Liveness::Dead)
    }
}

/// Uses the page from validation, or fetches it
pub(crate) async fn page_or_fetch(
    fetcher: &dyn Fetcher,
    link: &str,
    page: Option<&str>,
) -> Result<String, ModuleError> {
    match page {
        Some(page) => Ok(page.to_string()),
        None => fetch_page(fetcher, link).await,
    }
}

/// Creates the module registered under `name`
pub fn build_module(name: &str) -> Option<Box<dyn ServiceModule>> {
    let module: Box<dyn ServiceModule> = match name {
        "mega" => Box::new(Mega),
        "gofile" => Box::new(GoFile),
        "sendvid" => Box::new(Sendvid),
        "cyberdrop" => Box::new(Cyberdrop),
        "bunkr" => Box::new(Bunkr),
        "googledrive" => Box::new(GoogleDrive),
        "dood" => Box::new(Dood),
        "cloudmailru" => Box::new(CloudMailRu),
        _ => return None,
    };
    Some(module)
}

/// Ordered set of enabled service modules
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn ServiceModule>>,
}

impl ModuleRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every module in default order
    pub fn with_defaults() -> Self {
        Self {
            modules: MODULE_NAMES.iter().filter_map(|name| build_module(name)).collect(),
        }
    }

    /// Registry holding the named modules, in the given order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for name in names {
            let name = name.as_ref();
            let module =
                build_module(name).ok_or_else(|| ConfigError::UnknownModule(name.to_string()))?;
            registry.register(module);
        }
        Ok(registry)
    }

    /// Appends a module to the fan-out order
    pub fn register(&mut self, module: Box<dyn ServiceModule>) {
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Runs every module over `text` in registry order and concatenates the results
    pub async fn fan_out(&self, fetcher: &dyn Fetcher, text: &str, source: &str) -> Vec<Entry> {
        let mut entries = Vec::new();
        for module in &self.modules {
            entries.extend(module.delegate(fetcher, text, source).await);
        }
        entries
    }
}
