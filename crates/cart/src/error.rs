//! Cart operation errors.
//!
//! Every failure is reported through the [`Notifier`](crate::notify::Notifier)
//! at the operation boundary; [`CartError::notification`] decides which
//! message the user sees.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::api::ApiError;
use crate::notify::Notification;
use crate::store::StoreError;

/// The mutating operations a cart supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure(self) -> Notification {
        match self {
            Self::Add => Notification::AddFailed,
            Self::Remove => Notification::RemoveFailed,
            Self::UpdateAmount => Notification::UpdateFailed,
        }
    }
}

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is not below available stock.
    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// Quantity must be positive.
    #[error("Invalid quantity {amount} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, amount: i64 },

    /// Product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Catalog or stock lookup failed.
    #[error("Lookup error: {0}")]
    Lookup(#[from] ApiError),

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CartError {
    /// The message shown to the user when `operation` fails with this error.
    #[must_use]
    pub const fn notification(&self, operation: CartOperation) -> Notification {
        match self {
            Self::StockExceeded { .. } => Notification::StockExceeded,
            Self::InvalidQuantity { .. } => Notification::InvalidQuantity,
            Self::NotInCart(_) | Self::Lookup(_) | Self::Storage(_) => operation.failure(),
        }
    }

    /// Whether the user can fix this by choosing a different quantity.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::StockExceeded { .. } | Self::InvalidQuantity { .. }
        )
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::StockExceeded {
            product_id: ProductId::new(42),
            requested: 4,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "Requested 4 of product 42, only 3 in stock"
        );

        let err = CartError::NotInCart(ProductId::new(5));
        assert_eq!(err.to_string(), "Product 5 is not in the cart");
    }

    #[test]
    fn test_notification_mapping() {
        let stock = CartError::StockExceeded {
            product_id: ProductId::new(1),
            requested: 2,
            available: 2,
        };
        assert_eq!(
            stock.notification(CartOperation::Add),
            Notification::StockExceeded
        );
        assert_eq!(
            stock.notification(CartOperation::UpdateAmount),
            Notification::StockExceeded
        );

        let invalid = CartError::InvalidQuantity {
            product_id: ProductId::new(1),
            amount: 0,
        };
        assert_eq!(
            invalid.notification(CartOperation::UpdateAmount),
            Notification::InvalidQuantity
        );

        let lookup = CartError::Lookup(ApiError::NotFound("products/1".to_string()));
        assert_eq!(
            lookup.notification(CartOperation::Add),
            Notification::AddFailed
        );
        assert_eq!(
            lookup.notification(CartOperation::UpdateAmount),
            Notification::UpdateFailed
        );

        let missing = CartError::NotInCart(ProductId::new(1));
        assert_eq!(
            missing.notification(CartOperation::Remove),
            Notification::RemoveFailed
        );
    }

    #[test]
    fn test_user_correctable() {
        assert!(
            CartError::InvalidQuantity {
                product_id: ProductId::new(1),
                amount: -1,
            }
            .is_user_correctable()
        );
        assert!(!CartError::NotInCart(ProductId::new(1)).is_user_correctable());
    }
}
