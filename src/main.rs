// Entry point for the visual change-detection proxy

use changenet_proxy::{
    build_router, core::types::AppState, core::Config, services::CompareService,
    services::NvcfClient,
};

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration; a missing NVCF_API_KEY is fatal here
    let config = Arc::new(Config::new()?);

    // Initialize logging
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new(format!(
        "changenet_proxy={}",
        match config.log_level() {
            tracing::Level::TRACE => "trace",
            tracing::Level::DEBUG => "debug",
            tracing::Level::INFO => "info",
            tracing::Level::WARN => "warn",
            tracing::Level::ERROR => "error",
        }
    ));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let client = NvcfClient::new(&config.nvcf)?;
    let state = AppState {
        config: config.clone(),
        compare: Arc::new(CompareService::new(client)),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server_host(), config.server_port());
    info!("Server starting on http://{}", addr);
    info!("Endpoints:");
    info!("  GET     /         - Root endpoint");
    info!("  GET     /health   - Health check");
    info!("  POST    /compare  - Compare reference/test images (JSON)");
    info!("  OPTIONS /compare  - CORS preflight");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
