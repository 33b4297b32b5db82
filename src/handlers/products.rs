use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::Product;
use crate::observability::Metrics;
use crate::services::ProductCatalogService;

/// State for the product service routes
#[derive(Clone)]
pub struct ProductApiState {
    pub catalog_service: Arc<ProductCatalogService>,
    pub metrics: Arc<Metrics>,
}

/// List the whole catalog
#[instrument(name = "list_products", skip(state))]
pub async fn list_products(State(state): State<ProductApiState>) -> Json<Vec<Product>> {
    let products = state.catalog_service.list_products().to_vec();
    state.metrics.record_catalog_request(true);

    info!("Listing {} products", products.len());
    Json(products)
}
