//! Pet care backend server

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use petcare::api::{create_app, AppServices};
use petcare::logging::{init_logging, log_startup, LogFormat};
use petcare::services::SystemTimeProvider;
use petcare::{Config, DatabaseManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    init_logging(&config.log_level, LogFormat::for_environment(&config.environment));
    log_startup();
    config.log_config();

    let database_manager = DatabaseManager::new(&config.database_url).await?;
    database_manager.migrate().await?;
    database_manager.test_connection().await?;
    let database_manager = Arc::new(database_manager);

    let services = AppServices::new(
        database_manager.clone(),
        Arc::new(SystemTimeProvider::new()),
        config.tz()?,
    );
    let app = create_app(services, &config.cors_origins);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Pet care API listening on http://{}", config.bind_address());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    database_manager.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
