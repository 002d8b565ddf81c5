use std::sync::Arc;

use geo_scorer::GeoPipeline;

/// Shared across requests; the pipeline itself holds no per-request state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GeoPipeline>,
}

impl AppState {
    pub fn new(pipeline: GeoPipeline) -> Self {
        AppState {
            pipeline: Arc::new(pipeline),
        }
    }
}
