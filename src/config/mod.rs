use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Catalog, CatalogError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Catalog error: {source}")]
    Catalog {
        #[from]
        source: CatalogError,
    },
}

/// Which of the two services a configuration belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Product,
    Cart,
}

/// Separates the service prefix from the key, e.g. `MICROSHOP_CART__PORT`.
///
/// Kubernetes service links inject `<SERVICE>_PORT=tcp://...` with a single
/// underscore, so those variables never match a double-underscore prefix.
pub const ENV_PREFIX_SEPARATOR: &str = "__";

impl ServiceKind {
    pub fn env_prefix(&self) -> &'static str {
        match self {
            ServiceKind::Product => "MICROSHOP_PRODUCT",
            ServiceKind::Cart => "MICROSHOP_CART",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            ServiceKind::Product => 5001,
            ServiceKind::Cart => 5000,
        }
    }

    pub fn default_service_name(&self) -> &'static str {
        match self {
            ServiceKind::Product => "product-service",
            ServiceKind::Cart => "cart-service",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductServiceConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone)]
pub struct CartServiceConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// JSON file with the product list; the built-in seed is used when unset
    #[serde(default)]
    pub catalog_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_products_url")]
    pub products_url: String,
    #[serde(default)]
    pub upstream_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl ProductServiceConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        let kind = ServiceKind::Product;
        info!("Loading {} configuration from environment", kind.default_service_name());

        let config = Self {
            server: ServerConfig::from_env(kind)?,
            catalog: CatalogConfig::from_env(kind)?,
            observability: ObservabilityConfig::from_env(kind)?,
        };

        config.server.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }
}

impl CartServiceConfig {
    pub fn from_environment() -> Result<Self, ConfigError> {
        let kind = ServiceKind::Cart;
        info!("Loading {} configuration from environment", kind.default_service_name());

        let config = Self {
            server: ServerConfig::from_env(kind)?,
            upstream: UpstreamConfig::from_env(kind)?,
            observability: ObservabilityConfig::from_env(kind)?,
        };

        config.server.validate()?;
        config.upstream.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }
}

impl ServerConfig {
    pub(crate) fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        load_section(kind, "server", &[("port", i64::from(kind.default_port()))])
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Server host cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl CatalogConfig {
    pub(crate) fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        load_section(kind, "catalog", &[])
    }

    /// Resolve the catalog this service will serve
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog_path {
            Some(path) => {
                info!("Loading catalog from {}", path);
                Ok(Catalog::from_json_file(path)?)
            }
            None => {
                info!("Using built-in catalog");
                Ok(Catalog::seed())
            }
        }
    }
}

impl UpstreamConfig {
    pub(crate) fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        load_section(kind, "upstream", &[])
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.upstream_timeout_seconds.map(Duration::from_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let url = self.products_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ValidationError {
                message: format!("Products URL must be an absolute http(s) URL: {}", url),
            });
        }

        if reqwest::Url::parse(url).is_err() {
            return Err(ConfigError::ValidationError {
                message: format!("Products URL is not a valid URL: {}", url),
            });
        }

        if self.upstream_timeout_seconds == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "Upstream timeout cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

impl ObservabilityConfig {
    pub(crate) fn from_env(kind: ServiceKind) -> Result<Self, ConfigError> {
        let mut config: Self = load_section(kind, "observability", &[])?;

        // An empty endpoint disables export
        if config
            .otlp_endpoint
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            config.otlp_endpoint = None;
        }

        Ok(config)
    }
}

/// Build one config section from the service's environment prefix, with
/// per-service defaults applied underneath
fn load_section<T: DeserializeOwned>(
    kind: ServiceKind,
    section: &str,
    defaults: &[(&str, i64)],
) -> Result<T, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("service_name", kind.default_service_name())
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to set {} defaults: {}", section, e),
        })?;

    for (key, value) in defaults {
        builder = builder
            .set_default(*key, *value)
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to set {} defaults: {}", section, e),
            })?;
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(kind.env_prefix())
                .prefix_separator(ENV_PREFIX_SEPARATOR),
        )
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_products_url() -> String {
    "http://productservice:5001/products".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
