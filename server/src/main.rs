mod error;
mod handlers;
mod routes;
mod state;

use std::env;

use geo_scorer::{Config, GeoPipeline};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        warn!("AI_GATEWAY_API_KEY is not set; analyses will fail until it is configured");
    }

    let state = AppState::new(GeoPipeline::from_config(&config)?);
    let app = routes::app(state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
