pub mod cart;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod products;

pub use cart::*;
pub use health::*;
pub use metrics::*;
pub use middleware::*;
pub use products::*;
