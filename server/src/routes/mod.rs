pub mod geo;

use axum::{
    http::{header, HeaderName, Method},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::geo_handlers::not_found;
use crate::state::AppState;
use geo::geo_routes;

/// Full application router. The CORS layer answers `OPTIONS` preflights
/// itself and stamps every other response with the same permissive headers.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .merge(geo_routes())
        .fallback(not_found)
        .layer(Extension(state))
        .layer(cors)
}
