use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::observability::Metrics;

/// Prometheus text exposition format, version 0.0.4
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// `GET /metrics`: every family registered for this service.
///
/// The cart service exposes its upstream and `cart_operations_total`
/// families here, the product service its `catalog_requests_total`; both
/// carry the HTTP families from the observability middleware.
#[instrument(name = "metrics_handler", skip(metrics))]
pub async fn metrics_handler(
    State(metrics): State<Arc<Metrics>>,
) -> Result<Response, (StatusCode, &'static str)> {
    let body = metrics.encode().map_err(|err| {
        error!(error = %err, "Failed to encode metrics");
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics")
    })?;

    debug!(bytes = body.len(), "Encoded metrics");

    Ok((
        [(header::CONTENT_TYPE, HeaderValue::from_static(METRICS_CONTENT_TYPE))],
        body,
    )
        .into_response())
}
