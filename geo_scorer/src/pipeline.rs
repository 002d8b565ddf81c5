//! Fetch, extract, prompt, call, validate: the single entry point used by
//! both the CLI and the HTTP server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::{future::retry, ExponentialBackoffBuilder};
use tracing::{info, warn};
use url::Url;

use crate::ai::{AIAnalyzer, ModelGateway};
use crate::config::Config;
use crate::error::{GeoError, GeoResult};
use crate::parser::parse_and_validate;
use crate::prompt::{build_prompt, Prompt};
use crate::scraper::{extract, PageFetcher, Scraper};
use crate::GeoAnalysis;

/// How often a rate-limited model call is repeated before giving up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_interval: Duration::from_millis(0),
        }
    }
}

pub struct GeoPipeline {
    fetcher: Box<dyn PageFetcher>,
    gateway: Box<dyn ModelGateway>,
    max_content_chars: usize,
    retry: RetryPolicy,
}

impl GeoPipeline {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        gateway: Box<dyn ModelGateway>,
        max_content_chars: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            gateway,
            max_content_chars,
            retry,
        }
    }

    /// Wires the HTTP scraper and gateway client from `config`.
    pub fn from_config(config: &Config) -> GeoResult<Self> {
        Ok(Self::new(
            Box::new(Scraper::new(&config.user_agent, config.http_timeout)?),
            Box::new(AIAnalyzer::new(config)?),
            config.max_content_chars,
            RetryPolicy {
                max_retries: config.rate_limit_retries,
                initial_interval: config.retry_initial_interval,
            },
        ))
    }

    /// Runs one full analysis of `url`. Any failing step ends the run.
    #[tracing::instrument(skip(self), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn analyze(&self, url: &str) -> GeoResult<GeoAnalysis> {
        let url = validate_url(url)?;

        let html = self.fetcher.fetch(&url).await?;
        let text = extract(&html, self.max_content_chars);
        info!("Extracted {} characters of text", text.chars().count());

        let prompt = build_prompt(&text);
        let reply = self.call_model(&prompt).await?;

        let analysis = parse_and_validate(&reply)?;
        info!("Analysis complete with score {}", analysis.score());
        Ok(analysis)
    }

    /// Calls the gateway, repeating only on rate limiting and at most
    /// `max_retries` extra times.
    async fn call_model(&self, prompt: &Prompt) -> GeoResult<String> {
        let max_retries = self.retry.max_retries;
        if max_retries == 0 {
            return self.gateway.complete(prompt).await;
        }

        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.retry.initial_interval)
            .with_max_elapsed_time(None)
            .build();
        let attempts = AtomicU32::new(0);

        retry(backoff, || async {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            match self.gateway.complete(prompt).await {
                Ok(reply) => Ok(reply),
                Err(GeoError::RateLimited) if attempt < max_retries => {
                    warn!("Rate limited by AI gateway, retry {} of {}", attempt + 1, max_retries);
                    Err(backoff::Error::transient(GeoError::RateLimited))
                }
                Err(e) => Err(backoff::Error::permanent(e)),
            }
        })
        .await
    }
}

fn validate_url(raw: &str) -> GeoResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GeoError::BadRequest("URL is required".to_string()));
    }

    let url = Url::parse(raw).map_err(|e| GeoError::BadRequest(format!("Invalid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(GeoError::BadRequest(format!(
            "Invalid URL: unsupported scheme {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_a_bad_request() {
        assert_eq!(
            validate_url("   ").unwrap_err(),
            GeoError::BadRequest("URL is required".to_string())
        );
    }

    #[test]
    fn relative_or_non_http_urls_are_rejected() {
        assert!(matches!(validate_url("example.com"), Err(GeoError::BadRequest(_))));
        assert!(matches!(validate_url("ftp://example.com/a"), Err(GeoError::BadRequest(_))));
    }

    #[test]
    fn http_urls_are_trimmed_and_accepted() {
        let url = validate_url("  https://example.com/page ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }
}
