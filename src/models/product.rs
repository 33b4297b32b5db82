use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::errors::{CatalogError, CatalogResult};

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Immutable, ordered product list served for the lifetime of the process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Build a catalog after checking id uniqueness and names
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.name.trim().is_empty() {
                return Err(CatalogError::EmptyName { id: product.id });
            }
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId { id: product.id });
            }
        }

        Ok(Self {
            products: products.into(),
        })
    }

    /// The built-in seed table: Laptop, Mouse, Keyboard
    pub fn seed() -> Self {
        Self {
            products: vec![
                Product::new(1, "Laptop"),
                Product::new(2, "Mouse"),
                Product::new(3, "Keyboard"),
            ]
            .into(),
        }
    }

    /// Load a catalog from a JSON file holding an array of products
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let products: Vec<Product> = serde_json::from_str(&contents)?;
        Self::new(products)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_seed_catalog_order() {
        let catalog = Catalog::seed();
        let names: Vec<&str> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        let ids: Vec<i64> = catalog.products().iter().map(|p| p.id).collect();

        assert_eq!(names, vec!["Laptop", "Mouse", "Keyboard"]);
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_product_json_shape() {
        let product = Product::new(1, "Laptop");
        let json = serde_json::to_string(&product).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Laptop"}"#);
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let result = Catalog::new(vec![Product::new(7, "Desk"), Product::new(7, "Chair")]);
        match result {
            Err(CatalogError::DuplicateId { id }) => assert_eq!(id, 7),
            other => panic!("Expected DuplicateId, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_rejects_blank_names() {
        let result = Catalog::new(vec![Product::new(1, "  ")]);
        assert!(matches!(result, Err(CatalogError::EmptyName { id: 1 })));
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 10, "name": "Monitor"}}, {{"id": 11, "name": "Webcam"}}]"#)
            .unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.products()[0], Product::new(10, "Monitor"));
        assert_eq!(catalog.products()[1], Product::new(11, "Webcam"));
    }

    #[test]
    fn test_catalog_from_missing_file() {
        let result = Catalog::from_json_file("/nonexistent/catalog.json");
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_catalog_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 1}}"#).unwrap();

        let result = Catalog::from_json_file(file.path());
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }
}
