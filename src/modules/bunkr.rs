//! Bunkr albums
//!
//! Bunkr moves between mirror domains; links on any known mirror are
//! rewritten to the current one before extraction.

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{fetch_page, markup, page_or_fetch, validate_ok, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Current album domain
const DOMAIN: &str = "bunkrr.su";

/// View counter endpoint; the album URL is appended
const VIEWS_URL: &str = "https://slut.bunkr.ru/slutsCount?pageUrl=";

static MIRROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bbunkr\.(is|ru|su|la)\b").unwrap());

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://bunkrr\.su/a/[a-zA-Z0-9]{8}").unwrap());

static INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"">\s*(\d[\d,]*)\s*files\s*\((\d+(?:\.\d+)?\s*[KMGTP]?B)\)\s*</span"#).unwrap()
});

static THUMBNAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:i(?:-pizza|-burger|\d+)|big-taco-1img)\.bunkr\.ru/thumbs/[^\s\x22']*?\.(?:png|jpg|jpeg)")
        .unwrap()
});

pub struct Bunkr;

impl Bunkr {
    /// Rewrites mirror domains in `text` to the current domain
    pub fn rewrite_mirrors(text: &str) -> String {
        MIRROR.replace_all(text, DOMAIN).into_owned()
    }

    /// Reads the album's view counter; failures leave the count empty
    async fn views(fetcher: &dyn Fetcher, link: &str) -> Option<u64> {
        match fetch_page(fetcher, &format!("{}{}", VIEWS_URL, link)).await {
            Ok(body) => markup::count(&body),
            Err(e) => {
                tracing::debug!("Bunkr view count for {} unavailable: {}", link, e);
                None
            }
        }
    }
}

#[async_trait]
impl ServiceModule for Bunkr {
    fn name(&self) -> &'static str {
        "bunkr"
    }

    fn service(&self) -> &'static str {
        "Bunkr"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        markup::unique_matches(&LINK, &Self::rewrite_mirrors(text))
    }

    async fn validate(&self, fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError> {
        validate_ok(fetcher, link).await
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
        entry.content_type = Some(ContentType::Folder);
        entry.title = markup::title(&page).map(|t| t.trim_end_matches(" | Bunkr").to_string());

        if let Some(caps) = INFO.captures(&page) {
            entry.file_count = caps.get(1).and_then(|c| markup::count(c.as_str()));
            entry.size = caps.get(2).map(|s| s.as_str().to_string());
        }

        entry.thumbnail = markup::first(&THUMBNAIL, &page).map(|url| markup::unescape_url(&url));
        entry.views = Self::views(fetcher, link).await;

        Ok(entry)
    }
}
