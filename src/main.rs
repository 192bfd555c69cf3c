//! Main entry point for the Study Serving Gateway

use study_serving_gateway::{
    api,
    backend::{health::HealthMonitor, ModelSet},
    config::{LoggingConfig, Settings},
    AppState,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_tracing(&settings.logging);

    info!("Starting Study Serving Gateway");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Models are built once; any failure here aborts startup
    let models = ModelSet::from_config(&settings.models)?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let health_interval = settings.health.interval_secs;

    let app_state = Arc::new(AppState::new(settings, models));

    let _health_task = HealthMonitor::new(app_state.models.clone()).start(health_interval);

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
