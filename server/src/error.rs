use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geo_scorer::GeoError;
use serde_json::json;

/// Renders any pipeline failure as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError(pub GeoError);

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
