//! Mega (mega.nz) files and folders

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{fetch_page, markup, page_or_fetch, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Public API endpoint; the node id is appended
const API_URL: &str = "https://g.api.mega.co.nz/cs?id=5644474&n=";

/// API reply fragment that marks a live node
const LIVE_MARKER: &str = "-2";

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://mega\.nz/(folder|file)/([a-zA-Z0-9]{0,8})#([a-zA-Z0-9_-]{43}|[a-zA-Z0-9_-]{22})")
        .unwrap()
});

pub struct Mega;

impl Mega {
    /// The node id between the type segment and the `#key`
    fn node_id(link: &str) -> Option<String> {
        LINK.captures(link)
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl ServiceModule for Mega {
    fn name(&self) -> &'static str {
        "mega"
    }

    fn service(&self) -> &'static str {
        "Mega"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        markup::unique_matches(&LINK, text)
    }

    async fn validate(&self, fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError> {
        let id = Self::node_id(link).ok_or_else(|| ModuleError::Malformed {
            service: self.service(),
            link: link.to_string(),
            reason: "no node id".to_string(),
        })?;

        let reply = fetch_page(fetcher, &format!("{}{}", API_URL, id)).await?;
        if reply.contains(LIVE_MARKER) {
            Ok(Liveness::Live { page: None })
        } else {
            Ok(Liveness::Dead)
        }
    }

    async fn enrich(
        &self,
        fetcher: &dyn Fetcher,
        link: &str,
        page: Option<&str>,
        source: &str,
    ) -> Result<Entry, ModuleError> {
        let page = page_or_fetch(fetcher, link, page).await?;

        let mut entry = Entry::new(self.service(), link, source);
        entry.size = markup::size(&page);

        if link.contains("/folder/") {
            entry.content_type = Some(ContentType::Folder);
            entry.file_count = markup::meta(&page, "og:description").and_then(|d| markup::count(&d));
        } else {
            entry.content_type = Some(ContentType::File);
        }

        Ok(entry)
    }
}
