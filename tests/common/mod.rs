use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reqwest::Client;
use tokio::net::TcpListener;

use microshop_rs::{
    clients::HttpProductClient,
    create_cart_app, create_product_app,
    handlers::ServiceInfo,
    models::Catalog,
    services::{CartService, ProductCatalogService},
    Metrics,
};

/// A product service and a cart service wired together on ephemeral ports
pub struct TestEnvironment {
    pub client: Client,
    pub product_base_url: String,
    pub cart_base_url: String,
    pub cart_metrics: Arc<Metrics>,
}

/// Serve `app` on 127.0.0.1 with an OS-assigned port and return its base URL
pub async fn spawn_app(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Failed to serve app");
    });

    format!("http://{}", addr)
}

pub async fn spawn_product_service(catalog: Catalog) -> String {
    let app = create_product_app(
        Arc::new(ProductCatalogService::new(catalog)),
        Arc::new(Metrics::new().expect("Failed to create metrics")),
        ServiceInfo::new("product-service", "test"),
    );
    spawn_app(app).await
}

/// Start a cart service pointed at `products_url`
pub async fn spawn_cart_service(
    products_url: String,
    timeout: Option<Duration>,
) -> (String, Arc<Metrics>) {
    let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));
    let product_client = Arc::new(
        HttpProductClient::new(products_url, timeout).expect("Failed to build product client"),
    );
    let app = create_cart_app(
        Arc::new(CartService::new(product_client, metrics.clone())),
        metrics.clone(),
        ServiceInfo::new("cart-service", "test"),
    );
    (spawn_app(app).await, metrics)
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_catalog(Catalog::seed()).await
    }

    pub async fn with_catalog(catalog: Catalog) -> Self {
        let product_base_url = spawn_product_service(catalog).await;
        let (cart_base_url, cart_metrics) =
            spawn_cart_service(format!("{}/products", product_base_url), None).await;

        // Wait for servers to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            client: Client::new(),
            product_base_url,
            cart_base_url,
            cart_metrics,
        }
    }

    pub async fn get_json(&self, url: &str) -> (u16, serde_json::Value) {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .expect("Failed to send request");
        let status = response.status().as_u16();
        let body = response.json().await.expect("Failed to parse response");
        (status, body)
    }
}
