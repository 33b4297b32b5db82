use thiserror::Error;

/// Service-level errors raised while composing a cart
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Upstream payload error: {message}")]
    UpstreamPayload { message: String },
}

/// Errors building a product catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("Duplicate product id: {id}")]
    DuplicateId { id: i64 },

    #[error("Product {id} has an empty name")]
    EmptyName { id: i64 },
}

impl ServiceError {
    /// Short label used for metrics and logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::UpstreamUnavailable { .. } => "unavailable",
            ServiceError::UpstreamStatus { .. } => "status",
            ServiceError::UpstreamPayload { .. } => "payload",
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::UpstreamPayload {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            ServiceError::UpstreamStatus {
                status: status.as_u16(),
            }
        } else {
            ServiceError::UpstreamUnavailable {
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for catalog construction
pub type CatalogResult<T> = Result<T, CatalogError>;
