//! Prediction Service - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, Settings};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load configuration")?;
    init_logging(&settings.log_level, settings.log_json);

    info!("=== Prediction Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Serving {} model", settings.variant);

    run_server(settings).await
}
