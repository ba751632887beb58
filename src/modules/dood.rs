//! DoodStream videos

use crate::discovery::Fetcher;
use crate::entry::{ContentType, Entry};
use crate::modules::{markup, Liveness, ModuleError, ServiceModule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

const DOMAIN: &str = "doods.pro";

const DEAD_TITLE: &str = "<title>Video not found | DoodStream</title>";

/// Status of the JavaScript challenge page; the video is there behind it
const CHALLENGE_STATUS: u16 = 403;

static MIRROR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bdood\.(watch|one|la|re|wf|yt|so|pm|sh|to|ws)\b").unwrap());

static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"https?://(?:doods|dood)\.(?:la|re|wf|so|yt|pm|sh|to|ws|one|watch|pro|stream)/(?:f/[a-z0-9]{10}|d/[a-z0-9]{32}|d/[a-z0-9]{31}|d/[a-z0-9]{12}|e/[a-z0-9]{12})",
    )
    .unwrap()
});

pub struct Dood;

impl Dood {
    /// Rewrites mirror domains in `text` to the current domain
    pub fn rewrite_mirrors(text: &str) -> String {
        MIRROR.replace_all(text, DOMAIN).into_owned()
    }
}

#[async_trait]
impl ServiceModule for Dood {
    fn name(&self) -> &'static str {
        "dood"
    }

    fn service(&self) -> &'static str {
        "Dood"
    }

    fn extract(&self, text: &str) -> Vec<String> {
        markup::unique_matches(&LINK, &Self::rewrite_mirrors(text))
    }

    async fn validate(&self, fetcher: &dyn Fetcher, link: &str) -> Result<Liveness, ModuleError> {
        let response = fetcher.get(link).await?;
        if response.status == CHALLENGE_STATUS || !response.text().contains(DEAD_TITLE) {
            Ok(Liveness::Live { page: None })
        } else {
            Ok(Liveness::Dead)
        }
    }

    async fn enrich(
        &self,
        _fetcher: &dyn Fetcher,
        link: &str,
        _page: Option<&str>,
        source: &str,
    ) -> Result<Entry, ModuleError> {
        let mut entry = Entry::new(self.service(), link, source);
        entry.content_type = Some(ContentType::File);
        Ok(entry)
    }
}
