use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::models::{ServiceError, ServiceResult};

/// Source of the product list the cart is cut from
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductClient: Send + Sync {
    /// Name used in logs and upstream metrics
    fn upstream_name(&self) -> &'static str;

    /// Elements come back exactly as the upstream sent them
    async fn fetch_products(&self) -> ServiceResult<Vec<Value>>;
}

/// `ProductClient` backed by the product service's `GET /products`
#[derive(Debug, Clone)]
pub struct HttpProductClient {
    client: Client,
    products_url: String,
}

impl HttpProductClient {
    /// Build a client for `products_url`; no timeout is applied unless given
    pub fn new(products_url: impl Into<String>, timeout: Option<Duration>) -> ServiceResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ServiceError::UpstreamUnavailable {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            products_url: products_url.into(),
        })
    }

    pub fn products_url(&self) -> &str {
        &self.products_url
    }
}

#[async_trait]
impl ProductClient for HttpProductClient {
    fn upstream_name(&self) -> &'static str {
        "product-service"
    }

    #[instrument(skip(self), fields(url = %self.products_url))]
    async fn fetch_products(&self) -> ServiceResult<Vec<Value>> {
        let response = self.client.get(&self.products_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        // Any JSON array is accepted; its elements are not inspected
        let products: Vec<Value> =
            serde_json::from_slice(&body).map_err(|e| ServiceError::UpstreamPayload {
                message: e.to_string(),
            })?;

        debug!("Fetched {} products from upstream", products.len());
        Ok(products)
    }
}
