//! Cloud Mail.ru public links
//!
//! Public pages embed the shared item's metadata as JSON under
//! `"serverSideFolders"`. Each field is read on its own; one that is
//! missing or mistyped is left empty.

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{markup, page_or_fetch, validate_ok, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://cloud\.mail\.ru/public/[a-zA-Z0-9]{4}/[a-zA-Z0-9]{9}").unwrap()
});

static FOLDER_INFO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"serverSideFolders":(\{.*?\}),"DISPATCHERS":"#).unwrap());

pub struct CloudMailRu;

impl CloudMailRu {
    /// The embedded metadata object, if present and valid JSON
    fn folder_info(page: &str, link: &str) -> Option<Value> {
        let Some(raw) = markup::capture(&FOLDER_INFO, page) else {
            tracing::debug!("CloudMailRu: no serverSideFolders block for {}", link);
            return None;
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::debug!("CloudMailRu: unreadable metadata for {}: {}", link, e);
                None
            }
        }
    }
}

fn text(info: &Value, key: &str) -> Option<String> {
    info.get(key)?.as_str().map(str::to_string)
}

/// Reads an integer that may also be sent as a string or a float
fn integer(info: &Value, key: &str) -> Option<i64> {
    match info.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl ServiceModule for CloudMailRu {
    fn name(&self) -> &'static str {
        "cloudmailru"
    }

    fn service(&self) -> &'static str {
        "CloudMailRu"
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
        let Some(info) = Self::folder_info(&page, link) else {
            return Ok(entry);
        };

        entry.title = text(&info, "name");
        entry.size = integer(&info, "size")
            .filter(|bytes| *bytes >= 0)
            .map(|bytes| bytes.to_string());
        entry.content_type = text(&info, "type").as_deref().and_then(ContentType::from_kind);
        entry.uploaded = integer(&info, "mtime")
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|time| time.format("%b %d, %Y").to_string());
        entry.integrity_hash = text(&info, "hash");
        entry.malware_status = info
            .get("malware")
            .and_then(|malware| text(malware, "status"));

        Ok(entry)
    }
}
