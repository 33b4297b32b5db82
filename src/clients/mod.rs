// Clients for upstream services

pub mod product_client;

pub use product_client::{HttpProductClient, ProductClient};

#[cfg(test)]
pub use product_client::MockProductClient;
