use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::error::{FetchStage, GeoError, GeoResult};

/// Source of raw HTML for the page under analysis.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> GeoResult<String>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> GeoResult<String> {
        (**self).fetch(url).await
    }
}

/// Fetches a single page over HTTP; no link following.
pub struct Scraper {
    client: Client,
    user_agent: String,
}

impl Scraper {
    pub fn new(user_agent: &str, timeout: Duration) -> GeoResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GeoError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl PageFetcher for Scraper {
    async fn fetch(&self, url: &Url) -> GeoResult<String> {
        info!("Fetching website content for: {}", url);

        let res = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| GeoError::fetch(FetchStage::Website, e))?;

        let status = res.status();
        if !status.is_success() {
            warn!("{} HTTP error: {}", url, status);
            return Err(GeoError::fetch(FetchStage::Website, status.as_u16()));
        }

        res.text()
            .await
            .map_err(|e| GeoError::fetch(FetchStage::Website, e))
    }
}

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap())
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Turns raw HTML into the plain text sent to the model.
///
/// Script and style blocks go first so their bodies never survive tag
/// stripping. Remaining tags become a space, whitespace runs collapse to one
/// space, and the result is cut to `max_chars` characters (not word-aware).
pub fn extract(html: &str, max_chars: usize) -> String {
    let text = script_re().replace_all(html, "");
    let text = style_re().replace_all(&text, "");
    let text = tag_re().replace_all(&text, " ");
    let text = whitespace_re().replace_all(&text, " ");
    truncate_chars(text.trim(), max_chars).to_string()
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
