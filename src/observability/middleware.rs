use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::{sync::Arc, time::Instant};
use tracing::{error, field, info, instrument, Span};
use uuid::Uuid;

use super::Metrics;
use crate::models::ServiceError;

/// Middleware for automatic request tracing and metrics collection
#[instrument(skip_all, fields(
    request_id = %Uuid::new_v4(),
    method = %request.method(),
    uri = %request.uri(),
    endpoint = field::Empty,
))]
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();

    // Prefer the matched route so path parameters do not explode label cardinality
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    Span::current().record("endpoint", endpoint.as_str());

    // Released on drop, so a request abandoned by its client is not left counted
    let _in_flight = InFlightGuard::new(metrics.clone(), &method, &endpoint);

    info!("Processing request");

    let response = next.run(request).await;

    let duration = start_time.elapsed();
    let status_code = response.status().as_u16();

    metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());

    if status_code >= 400 {
        error!(
            status_code = status_code,
            duration_ms = duration.as_millis(),
            "Request completed with error"
        );
    } else {
        info!(
            status_code = status_code,
            duration_ms = duration.as_millis(),
            "Request completed successfully"
        );
    }

    response
}

/// Holds one `http_requests_in_flight` slot until dropped
struct InFlightGuard {
    metrics: Arc<Metrics>,
    method: String,
    endpoint: String,
}

impl InFlightGuard {
    fn new(metrics: Arc<Metrics>, method: &str, endpoint: &str) -> Self {
        metrics.increment_in_flight(method, endpoint);
        Self {
            metrics,
            method: method.to_string(),
            endpoint: endpoint.to_string(),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.metrics.decrement_in_flight(&self.method, &self.endpoint);
    }
}

/// Tracing and metrics around calls to an upstream service
pub struct UpstreamTracingMiddleware {
    metrics: Arc<Metrics>,
}

impl UpstreamTracingMiddleware {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    #[instrument(skip_all, fields(upstream = %upstream))]
    pub async fn trace_call<F, T>(&self, upstream: &str, future: F) -> Result<T, ServiceError>
    where
        F: std::future::Future<Output = Result<T, ServiceError>>,
    {
        let start_time = Instant::now();

        info!("Calling upstream");

        let result = future.await;
        let duration = start_time.elapsed();

        match &result {
            Ok(_) => {
                self.metrics
                    .record_upstream_request(upstream, "success", duration.as_secs_f64());
                info!(
                    duration_ms = duration.as_millis(),
                    "Upstream call completed successfully"
                );
            }
            Err(err) => {
                self.metrics
                    .record_upstream_request(upstream, err.kind(), duration.as_secs_f64());
                error!(
                    error = %err,
                    duration_ms = duration.as_millis(),
                    "Upstream call failed"
                );
            }
        }

        result
    }
}

/// Middleware for business operation tracing
pub struct BusinessTracingMiddleware {
    metrics: Arc<Metrics>,
}

impl BusinessTracingMiddleware {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    /// Trace a cart operation
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn trace_cart_operation<F, T, E>(&self, operation: &str, future: F) -> Result<T, E>
    where
        F: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();

        info!("Starting cart operation");

        match future.await {
            Ok(result) => {
                self.metrics.record_cart_operation(operation, true);

                info!(
                    duration_ms = start_time.elapsed().as_millis(),
                    "Cart operation completed successfully"
                );

                Ok(result)
            }
            Err(error) => {
                self.metrics.record_cart_operation(operation, false);

                error!(
                    error = %error,
                    duration_ms = start_time.elapsed().as_millis(),
                    "Cart operation failed"
                );

                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_with(metrics: Arc<Metrics>) -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route(
                "/hang",
                get(|| async { std::future::pending::<&'static str>().await }),
            )
            .layer(middleware::from_fn(move |req, next| {
                observability_middleware(metrics.clone(), req, next)
            }))
    }

    fn in_flight(metrics: &Metrics, endpoint: &str) -> f64 {
        metrics
            .http_requests_in_flight
            .with_label_values(&["GET", endpoint])
            .get()
    }

    #[tokio::test]
    async fn test_in_flight_released_after_response() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let request = axum::http::Request::builder()
            .uri("/ok")
            .body(Body::empty())
            .unwrap();

        let response = app_with(metrics.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(in_flight(&metrics, "/ok"), 0.0);
        let total = metrics
            .http_requests_total
            .with_label_values(&["GET", "/ok", "200"])
            .get();
        assert_eq!(total, 1.0);
    }

    #[tokio::test]
    async fn test_in_flight_released_when_request_is_dropped() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let request = axum::http::Request::builder()
            .uri("/hang")
            .body(Body::empty())
            .unwrap();

        let mut call = Box::pin(app_with(metrics.clone()).oneshot(request));
        let pending = tokio::time::timeout(Duration::from_millis(50), &mut call).await;
        assert!(pending.is_err());
        assert_eq!(in_flight(&metrics, "/hang"), 1.0);

        // Client went away
        drop(call);

        assert_eq!(in_flight(&metrics, "/hang"), 0.0);
    }

    #[tokio::test]
    async fn test_upstream_tracing_records_success() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let tracer = UpstreamTracingMiddleware::new(metrics.clone());

        let result = tracer
            .trace_call("product-service", async { Ok::<_, ServiceError>(3) })
            .await;

        assert_eq!(result.unwrap(), 3);
        let count = metrics
            .upstream_requests_total
            .with_label_values(&["product-service", "success"])
            .get();
        assert_eq!(count, 1.0);
    }

    #[tokio::test]
    async fn test_upstream_tracing_labels_failures_by_kind() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let tracer = UpstreamTracingMiddleware::new(metrics.clone());

        let result: Result<(), _> = tracer
            .trace_call("product-service", async {
                Err(ServiceError::UpstreamStatus { status: 503 })
            })
            .await;

        assert!(result.is_err());
        let count = metrics
            .upstream_requests_total
            .with_label_values(&["product-service", "status"])
            .get();
        assert_eq!(count, 1.0);
    }

    #[tokio::test]
    async fn test_cart_operation_tracing() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let tracer = BusinessTracingMiddleware::new(metrics.clone());

        let _ = tracer
            .trace_cart_operation("build_cart", async { Err::<(), _>("boom") })
            .await;

        let failures = metrics
            .cart_operations_total
            .with_label_values(&["build_cart", "error"])
            .get();
        assert_eq!(failures, 1.0);
    }
}
