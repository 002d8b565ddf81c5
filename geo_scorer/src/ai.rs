use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{FetchStage, GeoError, GeoResult};
use crate::prompt::Prompt;

/// Chat-completion endpoint that scores the page.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Sends one request and returns the first choice's message content.
    async fn complete(&self, prompt: &Prompt) -> GeoResult<String>;
}

#[async_trait]
impl<T: ModelGateway + ?Sized> ModelGateway for Arc<T> {
    async fn complete(&self, prompt: &Prompt) -> GeoResult<String> {
        (**self).complete(prompt).await
    }
}

pub struct AIAnalyzer {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl AIAnalyzer {
    pub fn new(config: &Config) -> GeoResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| GeoError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.gateway_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn headers(&self) -> GeoResult<HeaderMap> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GeoError::Internal("AI_GATEWAY_API_KEY not configured".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| GeoError::Internal("AI_GATEWAY_API_KEY is not a valid header value".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl ModelGateway for AIAnalyzer {
    async fn complete(&self, prompt: &Prompt) -> GeoResult<String> {
        let headers = self.headers()?;

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "temperature": self.temperature
        });

        info!("Analyzing content with model {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeoError::fetch(FetchStage::Gateway, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("AI API error: {} {}", status, body);
            return Err(status_error(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GeoError::fetch(FetchStage::Gateway, e))?;

        let completion = serde_json::from_slice::<ChatCompletion>(&body).map_err(|e| {
            error!("Malformed chat completion envelope: {}", e);
            GeoError::Parse
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                error!("Chat completion carried no message content");
                GeoError::Parse
            })?;

        debug!("AI Response: {}", content);
        Ok(content)
    }
}

/// Maps a non-2xx gateway status onto the error taxonomy.
pub fn status_error(status: StatusCode) -> GeoError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => GeoError::RateLimited,
        StatusCode::PAYMENT_REQUIRED => GeoError::QuotaExhausted,
        other => GeoError::Upstream {
            status: other.as_u16(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_and_rate_limit_statuses_are_distinct() {
        assert_eq!(status_error(StatusCode::TOO_MANY_REQUESTS), GeoError::RateLimited);
        assert_eq!(status_error(StatusCode::PAYMENT_REQUIRED), GeoError::QuotaExhausted);
        assert_eq!(
            status_error(StatusCode::BAD_GATEWAY),
            GeoError::Upstream { status: 502 }
        );
        assert_eq!(
            status_error(StatusCode::UNAUTHORIZED),
            GeoError::Upstream { status: 401 }
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = Config {
            gateway_url: "http://127.0.0.1:9/unreachable".to_string(),
            ..Config::default()
        };
        let analyzer = AIAnalyzer::new(&config).unwrap();
        let err = analyzer
            .complete(&crate::prompt::build_prompt("text"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GeoError::Internal("AI_GATEWAY_API_KEY not configured".to_string())
        );
    }

    #[test]
    fn completion_envelope_reads_first_choice() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"score\":1}"}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(
            completion.choices[0].message.content.as_deref(),
            Some(r#"{"score":1}"#)
        );
    }
}
