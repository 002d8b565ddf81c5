use std::time::Duration;

use crate::error::{GeoError, GeoResult};

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; GEOScorer/1.0)";
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 15_000;

/// Runtime settings for one pipeline instance.
///
/// Read once (from the environment or any other lookup) and handed to
/// [`crate::GeoPipeline::from_config`]; nothing reads the environment later.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    pub temperature: f32,
    pub user_agent: String,
    pub max_content_chars: usize,
    pub http_timeout: Duration,
    pub rate_limit_retries: u32,
    pub retry_initial_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            http_timeout: Duration::from_secs(30),
            rate_limit_retries: 2,
            retry_initial_interval: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> GeoResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> GeoResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            api_key: get("AI_GATEWAY_API_KEY"),
            gateway_url: get("AI_GATEWAY_URL").unwrap_or(defaults.gateway_url),
            model: get("GEO_MODEL").unwrap_or(defaults.model),
            temperature: parse_var(&get, "GEO_TEMPERATURE")?.unwrap_or(defaults.temperature),
            user_agent: get("GEO_USER_AGENT").unwrap_or(defaults.user_agent),
            max_content_chars: parse_var(&get, "GEO_MAX_CONTENT_CHARS")?
                .unwrap_or(defaults.max_content_chars),
            http_timeout: parse_var(&get, "GEO_HTTP_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            rate_limit_retries: parse_var(&get, "GEO_RATE_LIMIT_RETRIES")?
                .unwrap_or(defaults.rate_limit_retries),
            retry_initial_interval: parse_var(&get, "GEO_RETRY_INITIAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_initial_interval),
        })
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> GeoResult<Option<T>>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| GeoError::Internal(format!("Invalid value for {key}: {raw}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_lookup_yields_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.api_key.is_none());
        assert_eq!(config.max_content_chars, 15_000);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("AI_GATEWAY_API_KEY", "secret"),
            ("GEO_MODEL", "other/model"),
            ("GEO_TEMPERATURE", "0.1"),
            ("GEO_HTTP_TIMEOUT_SECS", "5"),
            ("GEO_RATE_LIMIT_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.model, "other/model");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.rate_limit_retries, 0);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("AI_GATEWAY_API_KEY", "  ")])).unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("GEO_MAX_CONTENT_CHARS", "lots")])).unwrap_err();
        assert!(matches!(err, GeoError::Internal(msg) if msg.contains("GEO_MAX_CONTENT_CHARS")));
    }
}
