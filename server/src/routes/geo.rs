use axum::{routing::post, Router};

use crate::handlers::geo_handlers::{analyze_geo, method_not_allowed};

pub fn geo_routes() -> Router {
    Router::new().route("/analyze-geo", post(analyze_geo).fallback(method_not_allowed))
}
