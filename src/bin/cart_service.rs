use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use microshop_rs::{
    clients::HttpProductClient, create_cart_app, handlers::ServiceInfo, init_observability,
    services::CartService, shutdown_observability, CartServiceConfig, Metrics,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CartServiceConfig::from_environment().context("loading configuration")?;

    init_observability(&config.observability)?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Upstream products URL: {}", config.upstream.products_url);
    match config.upstream.timeout() {
        Some(timeout) => info!("Upstream timeout: {:?}", timeout),
        None => warn!("No upstream timeout configured; a hung product service blocks /cart"),
    }

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    let product_client = Arc::new(HttpProductClient::new(
        config.upstream.products_url.clone(),
        config.upstream.timeout(),
    )?);
    let cart_service = Arc::new(CartService::new(product_client, metrics.clone()));

    let app = create_cart_app(
        cart_service,
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
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
