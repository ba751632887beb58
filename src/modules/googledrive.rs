//! Google Drive shared files and folders

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{markup, page_or_fetch, validate_ok, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https?://drive\.google\.com/(folder|file|drive)/(d|folders)/(1[a-zA-Z0-9_-]{32}|0[a-zA-Z0-9_-]{27})",
    )
    .unwrap()
});

pub struct GoogleDrive;

#[async_trait]
impl ServiceModule for GoogleDrive {
    fn name(&self) -> &'static str {
        "googledrive"
    }

    fn service(&self) -> &'static str {
        "Google Drive"
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
        entry.title = markup::title(&page).map(|t| t.trim_end_matches(" - Google Drive").to_string());
        entry.content_type = Some(if link.contains("/file/") {
            ContentType::File
        } else {
            ContentType::Folder
        });

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::StaticFetcher;

    const FILE_ID: &str = "1AbCdEfGhIjKlMnOpQrStUvWxYz012345";
    const FOLDER_ID: &str = "0AbCdEfGhIjKlMnOpQrStUvWxYz9";

    fn file_link() -> String {
        format!("https://drive.google.com/file/d/{}", FILE_ID)
    }

    fn folder_link() -> String {
        format!("https://drive.google.com/drive/folders/{}", FOLDER_ID)
    }

    #[test]
    fn test_extract_both_shapes() {
        let text = format!("{}/view and {}?usp=sharing", file_link(), folder_link());
        assert_eq!(GoogleDrive.extract(&text), vec![file_link(), folder_link()]);
    }

    #[tokio::test]
    async fn test_file_and_folder_types() {
        let fetcher = StaticFetcher::new()
            .page(file_link(), 200, "<title>notes.pdf - Google Drive</title>")
            .page(folder_link(), 200, "<title>Scans - Google Drive</title>");
        let text = format!("{} {}", file_link(), folder_link());

        let entries = GoogleDrive.delegate(&fetcher, &text, "src").await;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, "Google Drive");
        assert_eq!(entries[0].title.as_deref(), Some("notes.pdf"));
        assert_eq!(entries[0].content_type, Some(ContentType::File));
        assert_eq!(entries[1].title.as_deref(), Some("Scans"));
        assert_eq!(entries[1].content_type, Some(ContentType::Folder));
    }
}
