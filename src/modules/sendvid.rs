//! Sendvid (sendvid.com) videos

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{markup, page_or_fetch, validate_ok, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://sendvid\.com/[a-z0-9]{8}").unwrap());

static THUMBNAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://thumbs[^\s\x22']*?\.jpg").unwrap());

static VIEWS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<p class="hits"><i class="icon-icn-view"></i>\s*([0-9][^<]*)</p>"#).unwrap()
});

pub struct Sendvid;

#[async_trait]
impl ServiceModule for Sendvid {
    fn name(&self) -> &'static str {
        "sendvid"
    }

    fn service(&self) -> &'static str {
        "Sendvid"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        markup::unique_matches(&LINK, text)
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
        entry.content_type = Some(ContentType::File);
        entry.title = markup::title(&page);
        entry.thumbnail = markup::first(&THUMBNAIL, &page).map(|url| markup::unescape_url(&url));
        entry.views = markup::capture(&VIEWS, &page).and_then(|v| markup::count(&v));

        Ok(entry)
    }
}
