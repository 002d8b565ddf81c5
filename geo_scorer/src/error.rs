//! Error taxonomy for the analysis pipeline.
//!
//! Every failure maps to exactly one variant; `Display` is the sentence
//! handed back to callers inside the `{ "error": ... }` envelope.

use std::fmt;

/// Which outbound round trip failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Website,
    Gateway,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Website => f.write_str("website"),
            FetchStage::Gateway => f.write_str("AI gateway"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Failed to fetch {stage}: {reason}")]
    Fetch { stage: FetchStage, reason: String },

    #[error("Rate limit reached. Please try again in a few moments.")]
    RateLimited,

    #[error("AI credits depleted. Please add credits to your workspace.")]
    QuotaExhausted,

    #[error("AI API error: {status}")]
    Upstream { status: u16 },

    #[error("Failed to parse AI analysis")]
    Parse,

    #[error("Invalid analysis structure from AI: {0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

pub type GeoResult<T> = std::result::Result<T, GeoError>;

impl GeoError {
    pub fn fetch(stage: FetchStage, reason: impl fmt::Display) -> Self {
        GeoError::Fetch {
            stage,
            reason: reason.to_string(),
        }
    }

    /// HTTP status the transport layer answers with.
    pub fn status_code(&self) -> u16 {
        match self {
            GeoError::BadRequest(_) => 400,
            GeoError::RateLimited => 429,
            GeoError::QuotaExhausted => 402,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_envelope_contract() {
        assert_eq!(GeoError::BadRequest("URL is required".into()).status_code(), 400);
        assert_eq!(GeoError::RateLimited.status_code(), 429);
        assert_eq!(GeoError::QuotaExhausted.status_code(), 402);
        assert_eq!(GeoError::Upstream { status: 503 }.status_code(), 500);
        assert_eq!(GeoError::fetch(FetchStage::Website, 404).status_code(), 500);
        assert_eq!(GeoError::Parse.status_code(), 500);
        assert_eq!(GeoError::Validation("x".into()).status_code(), 500);
        assert_eq!(GeoError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn fetch_message_names_stage_and_status() {
        let err = GeoError::fetch(FetchStage::Website, 404);
        assert_eq!(err.to_string(), "Failed to fetch website: 404");

        let err = GeoError::fetch(FetchStage::Gateway, "connection refused");
        assert_eq!(err.to_string(), "Failed to fetch AI gateway: connection refused");
    }

    #[test]
    fn upstream_message_carries_status() {
        assert_eq!(GeoError::Upstream { status: 503 }.to_string(), "AI API error: 503");
    }
}
