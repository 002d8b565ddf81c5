use axum::{body::Bytes, http::StatusCode, Extension, Json};
use geo_scorer::{GeoAnalysis, GeoError};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeGeoPayload {
    pub url: Option<String>,
}

/// POST /analyze-geo
///
/// The body is read as JSON whatever its `Content-Type`.
pub async fn analyze_geo(
    Extension(state): Extension<AppState>,
    body: Bytes,
) -> Result<Json<GeoAnalysis>, ApiError> {
    let payload: AnalyzeGeoPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        GeoError::BadRequest("Request body must be JSON with a url field".to_string())
    })?;

    let url = payload.url.unwrap_or_default();
    let analysis = state.pipeline.analyze(&url).await.map_err(|e| {
        error!("Error in analyze-geo: {}", e);
        ApiError(e)
    })?;

    Ok(Json(analysis))
}

pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
