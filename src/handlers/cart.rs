use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{Cart, ServiceError};
use crate::services::CartService;

/// State for the cart service routes
#[derive(Clone)]
pub struct CartApiState {
    pub cart_service: Arc<CartService>,
}

/// Build a cart from the current upstream catalog
#[instrument(name = "get_cart", skip(state))]
pub async fn get_cart(
    State(state): State<CartApiState>,
) -> Result<Json<Cart>, (StatusCode, Json<Value>)> {
    match state.cart_service.build_cart().await {
        Ok(cart) => {
            info!("Returning cart with {} items", cart.len());
            Ok(Json(cart))
        }
        Err(err) => {
            crate::error_with_trace!(error = %err, kind = err.kind(), "Failed to build cart");
            Err(service_error_to_response(err))
        }
    }
}

/// Every upstream failure surfaces as an opaque 500
pub fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, message) = match err {
        ServiceError::UpstreamUnavailable { .. }
        | ServiceError::UpstreamStatus { .. }
        | ServiceError::UpstreamPayload { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    };

    (
        status,
        Json(json!({
            "error": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
