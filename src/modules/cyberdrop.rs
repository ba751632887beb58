//! Cyberdrop (cyberdrop.me) albums
//!
//! Album pages pack most metadata into the title, e.g.
//! `Album: Name [12 files :: 1.2 GB] | CyberDrop`.

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{markup, page_or_fetch, validate_ok, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Site-wide description shown on albums without one of their own
const DEFAULT_DESCRIPTION: &str = "A privacy-focused censorship-resistant file sharing platform";

const DESCRIPTION_PREFIX: &str = "[Reg: CLOSED] - ";

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://cyberdrop\.me/a/[a-zA-Z0-9]{8}").unwrap());

static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[\d[\d,]* files.*?\|\s*CyberDrop\s*$").unwrap());

static FILE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d[\d,]*) files").unwrap());

static THUMBNAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://i0\.wp\.com[^\s\x22']*?\.png").unwrap());

static UPLOADED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<p class="heading">Uploaded</p>\s*<p class="title">\s*([^<]*?)\s*</p>"#).unwrap()
});

pub struct Cyberdrop;

impl Cyberdrop {
    fn album_title(raw: &str) -> String {
        let title = raw.strip_prefix("Album: ").unwrap_or(raw);
        TITLE_SUFFIX.replace(title, "").trim().to_string()
    }

    fn description(page: &str) -> Option<String> {
        let raw = markup::meta(page, "description").or_else(|| markup::meta(page, "og:description"))?;
        let description = raw.strip_prefix(DESCRIPTION_PREFIX).unwrap_or(&raw).trim();
        if description.is_empty() || description.contains(DEFAULT_DESCRIPTION) {
            None
        } else {
            Some(description.to_string())
        }
    }

    /// `dd.mm.yyyy` to `Mon DD, YYYY`
    fn upload_date(page: &str) -> Option<String> {
        let raw = markup::capture(&UPLOADED, page)?;
        let date = NaiveDate::parse_from_str(&raw, "%d.%m.%Y").ok()?;
        Some(date.format("%b %d, %Y").to_string())
    }
}

#[async_trait]
impl ServiceModule for Cyberdrop {
    fn name(&self) -> &'static str {
        "cyberdrop"
    }

    fn service(&self) -> &'static str {
        "Cyberdrop"
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
        let raw_title = markup::title(&page);

        let mut entry = Entry::new(self.service(), link, source);
        entry.content_type = Some(ContentType::Folder);
        if let Some(raw) = raw_title.as_deref() {
            entry.size = markup::size(raw);
            entry.file_count = markup::capture(&FILE_COUNT, raw).and_then(|c| markup::count(&c));
            entry.title = Some(Self::album_title(raw)).filter(|t| !t.is_empty());
        }
        entry.description = Self::description(&page);
        entry.thumbnail = markup::first(&THUMBNAIL, &page).map(|url| markup::unescape_url(&url));
        entry.uploaded = Self::upload_date(&page);

        Ok(entry)
    }
}
