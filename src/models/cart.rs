use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of leading upstream products that make up a cart
pub const CART_SIZE: usize = 2;

/// Request-scoped cart view: a prefix of the upstream product list.
///
/// Elements are kept as the upstream sent them, so fields the product
/// service adds later are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub cart: Vec<Value>,
}

impl Cart {
    /// Keep the first `CART_SIZE` products in upstream order.
    /// Shorter inputs are returned whole.
    pub fn from_products(mut products: Vec<Value>) -> Self {
        products.truncate(CART_SIZE);
        Self { cart: products }
    }

    pub fn items(&self) -> &[Value] {
        &self.cart
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}
