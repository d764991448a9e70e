//! truthscan-detector service entry point.

use anyhow::{Context, Result};
use tower_http::cors::{Any, CorsLayer};
use truthscan_common::config::Config;
use truthscan_common::logging::init_logging;
use truthscan_detector::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_with_env()?;
    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    );
    config.validate().context("Invalid configuration")?;

    tracing::info!("truthscan detector v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::from_config(&config);
    tracing::info!(
        model = %config.classifier.model,
        ai_configured = config.classifier.api_key.is_some(),
        data_dir = %state.datasets.dir().display(),
        "Classifier and datasets configured"
    );

    // The browser UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(state).layer(cors);

    let addr = config.listen_addr();

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
