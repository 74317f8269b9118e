//! Epidash Server
//!
//! Run with: cargo run --bin epidash
//!
//! # Configuration
//!
//! Read from the first config file found (see [`Config::load_default`]),
//! then overridden by environment variables:
//! - `EPIDASH_HOST`, `EPIDASH_PORT`: bind address (default: 0.0.0.0:5000)
//! - `EPIDASH_DATA_FILE`: case-data CSV (default: ./data/hk_district_cases.csv)
//! - `EPIDASH_STATIC_DIR`: static files (default: ./static)
//! - `EPIDASH_LOG_LEVEL`, `EPIDASH_LOG_FORMAT`: logging
//! - `RUST_LOG`: full filter, takes precedence over the configured level

use anyhow::Context;
use epidash::api::{serve, AppState};
use epidash::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    epidash::logging::init(&config.logging);

    tracing::info!("Starting Epidash server v{}", env!("CARGO_PKG_VERSION"));

    let api_config = config.api.clone();
    let state = AppState::new(config);

    if !state.source.exists() {
        tracing::warn!(
            path = ?state.source.path(),
            "Case-data file not found; /api/data will report an error until it appears"
        );
    }
    if !state.shape_available() {
        tracing::warn!(
            path = ?state.config.source.shape_file(),
            "Map shape not found; the map panel will stay empty"
        );
    }

    serve(state, &api_config)
        .await
        .with_context(|| format!("server on {} failed", api_config.addr()))?;

    tracing::info!("Epidash server stopped");
    Ok(())
}
