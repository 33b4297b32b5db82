use std::sync::Arc;
use tracing::{info, instrument};

use crate::clients::ProductClient;
use crate::models::{Cart, ServiceResult};
use crate::observability::{BusinessTracingMiddleware, Metrics, UpstreamTracingMiddleware};

/// Builds the cart view from the upstream product list
pub struct CartService {
    product_client: Arc<dyn ProductClient>,
    upstream_tracing: UpstreamTracingMiddleware,
    business_tracing: BusinessTracingMiddleware,
}

impl CartService {
    pub fn new(product_client: Arc<dyn ProductClient>, metrics: Arc<Metrics>) -> Self {
        Self {
            product_client,
            upstream_tracing: UpstreamTracingMiddleware::new(metrics.clone()),
            business_tracing: BusinessTracingMiddleware::new(metrics),
        }
    }

    /// Fetch the catalog once and keep its leading products.
    ///
    /// Upstream failures are returned as-is; there is no retry or fallback.
    #[instrument(skip(self))]
    pub async fn build_cart(&self) -> ServiceResult<Cart> {
        self.business_tracing
            .trace_cart_operation("build_cart", self.fetch_cart())
            .await
    }

    async fn fetch_cart(&self) -> ServiceResult<Cart> {
        let upstream = self.product_client.upstream_name();
        let products = self
            .upstream_tracing
            .trace_call(upstream, self.product_client.fetch_products())
            .await?;

        let cart = Cart::from_products(products);
        info!("Cart built with {} items", cart.len());
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::MockProductClient;
    use crate::models::ServiceError;
    use serde_json::{json, Value};

    fn mock_client(result: fn() -> ServiceResult<Vec<Value>>) -> MockProductClient {
        let mut client = MockProductClient::new();
        client
            .expect_upstream_name()
            .return_const("product-service");
        client
            .expect_fetch_products()
            .times(1)
            .returning(move || result());
        client
    }

    fn service_with(client: MockProductClient) -> (CartService, Arc<Metrics>) {
        let metrics = Arc::new(Metrics::new().unwrap());
        (CartService::new(Arc::new(client), metrics.clone()), metrics)
    }

    #[tokio::test]
    async fn test_build_cart_takes_first_two() {
        let (service, metrics) = service_with(mock_client(|| {
            Ok(vec![
                json!({"id": 1, "name": "Laptop"}),
                json!({"id": 2, "name": "Mouse"}),
                json!({"id": 3, "name": "Keyboard"}),
            ])
        }));

        let cart = service.build_cart().await.unwrap();

        assert_eq!(
            cart.items(),
            &[
                json!({"id": 1, "name": "Laptop"}),
                json!({"id": 2, "name": "Mouse"})
            ]
        );
        let successes = metrics
            .cart_operations_total
            .with_label_values(&["build_cart", "success"])
            .get();
        assert_eq!(successes, 1.0);
    }

    #[tokio::test]
    async fn test_build_cart_with_short_catalog() {
        let (service, _) =
            service_with(mock_client(|| Ok(vec![json!({"id": 4, "name": "Dock"})])));

        let cart = service.build_cart().await.unwrap();

        assert_eq!(cart.items(), &[json!({"id": 4, "name": "Dock"})]);
    }

    #[tokio::test]
    async fn test_build_cart_with_empty_catalog() {
        let (service, _) = service_with(mock_client(|| Ok(Vec::new())));

        let cart = service.build_cart().await.unwrap();

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_build_cart_propagates_upstream_errors() {
        let (service, metrics) = service_with(mock_client(|| {
            Err(ServiceError::UpstreamUnavailable {
                message: "connection refused".to_string(),
            })
        }));

        let result = service.build_cart().await;

        assert!(matches!(
            result,
            Err(ServiceError::UpstreamUnavailable { .. })
        ));
        let failures = metrics
            .upstream_requests_total
            .with_label_values(&["product-service", "unavailable"])
            .get();
        assert_eq!(failures, 1.0);
    }
}
