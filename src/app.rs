use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    cors_middleware, get_cart, health_check, list_products, metrics_handler,
    security_headers_middleware, CartApiState, ProductApiState, ServiceInfo,
};
use crate::observability::{observability_middleware, Metrics};
use crate::services::{CartService, ProductCatalogService};

/// Router for the product service: `GET /products`
pub fn create_product_app(
    catalog_service: Arc<ProductCatalogService>,
    metrics: Arc<Metrics>,
    info: ServiceInfo,
) -> Router {
    let api_state = ProductApiState {
        catalog_service,
        metrics: metrics.clone(),
    };

    let api = Router::new()
        .route("/products", get(list_products))
        .with_state(api_state);

    with_common_routes(api, metrics, info)
}

/// Router for the cart service: `GET /cart`
pub fn create_cart_app(
    cart_service: Arc<CartService>,
    metrics: Arc<Metrics>,
    info: ServiceInfo,
) -> Router {
    let api = Router::new()
        .route("/cart", get(get_cart))
        .with_state(CartApiState { cart_service });

    with_common_routes(api, metrics, info)
}

/// Health and metrics endpoints plus the middleware stack shared by both services
fn with_common_routes(api: Router, metrics: Arc<Metrics>, info: ServiceInfo) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        .route("/health/status", get(health_check))
        .with_state(info)
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .merge(api)
        // Outer to inner
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
        .layer(TraceLayer::new_for_http())
}
