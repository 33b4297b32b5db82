use tracing::{info, instrument};

use crate::models::{Catalog, Product};

/// Serves the product catalog loaded at startup
#[derive(Debug, Clone)]
pub struct ProductCatalogService {
    catalog: Catalog,
}

impl ProductCatalogService {
    pub fn new(catalog: Catalog) -> Self {
        info!("Product catalog ready with {} products", catalog.len());
        Self { catalog }
    }

    /// All products, in catalog order
    #[instrument(skip(self))]
    pub fn list_products(&self) -> &[Product] {
        self.catalog.products()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Default for ProductCatalogService {
    fn default() -> Self {
        Self::new(Catalog::seed())
    }
}
