//! GoFile (gofile.io) files and folders

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{fetch_page, markup, page_or_fetch, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

/// Landing-page title served for links that no longer exist
const DEAD_TITLE: &str = "<title>Gofile - Free Unlimited File Sharing and Storage</title>";

const FOLDER_PREFIX: &str = "Folder ";

static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://gofile\.io/d/[a-zA-Z0-9]{6}").unwrap());

pub struct GoFile;

#[async_trait]
impl ServiceModule for GoFile {
    fn name(&self) -> &'static str {
        "gofile"
    }

    fn service(&self) -> &'static str {
        "GoFile"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        markup::unique_matches(&LINK, text)
    }

    async fn validate(&self, fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError> {
        let page = fetch_page(fetcher, link).await?;
        if page.contains(DEAD_TITLE) {
            Ok(Liveness::Dead)
        } else {
            Ok(Liveness::Live { page: Some(page) })
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
        let description = markup::meta(&page, "description");

        let mut entry = Entry::new(self.service(), link, source);
        match markup::title(&page) {
            Some(title) if title.starts_with(FOLDER_PREFIX) => {
                entry.title = Some(title[FOLDER_PREFIX.len()..].to_string());
                entry.content_type = Some(ContentType::Folder);
                entry.file_count = description.as_deref().and_then(markup::count);
            }
            title => {
                entry.title = title;
                entry.content_type = Some(ContentType::File);
                entry.downloads = description.as_deref().and_then(markup::count);
            }
        }

        Ok(entry)
    }
}
