pub mod app;
pub mod clients;
pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod services;

pub use self::app::{create_cart_app, create_product_app};
pub use self::config::{CartServiceConfig, ConfigError, ProductServiceConfig, ServiceKind};
pub use self::observability::{init_observability, shutdown_observability, Metrics};
