use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use microshop_rs::{
    create_product_app, handlers::ServiceInfo, init_observability,
    services::ProductCatalogService, shutdown_observability, Metrics, ProductServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProductServiceConfig::from_environment().context("loading configuration")?;

    init_observability(&config.observability)?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let catalog = config.catalog.load_catalog()?;
    let catalog_service = Arc::new(ProductCatalogService::new(catalog));

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let app = create_product_app(
        catalog_service,
        metrics,
        ServiceInfo::new(
            config.observability.service_name.clone(),
            config.observability.service_version.clone(),
        ),
    );

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("parsing host {}", config.server.host))?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
