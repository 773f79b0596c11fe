//! Catalog and stock records as returned by the storefront API.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product.
///
/// Display attributes are opaque to the cart; only `id` takes part in cart
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// Available quantity for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `quantity` units can be held in a cart.
    ///
    /// The comparison is strict, so the last unit of stock is never
    /// reachable.
    #[must_use]
    pub const fn allows(&self, quantity: u32) -> bool {
        quantity < self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_api_shape() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada","price":179.9,"image":"https://cdn/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(17990));
        assert_eq!(product.image, "https://cdn/1.jpg");
    }

    #[test]
    fn test_stock_allows_is_strict() {
        let stock = Stock {
            id: ProductId::new(42),
            amount: 3,
        };
        assert!(stock.allows(2));
        assert!(!stock.allows(3));
        assert!(!stock.allows(4));
    }

    #[test]
    fn test_zero_stock_allows_nothing() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 0,
        };
        assert!(!stock.allows(0));
    }
}
