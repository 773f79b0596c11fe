//! Cart state manager.
//!
//! [`CartManager`] owns the live [`Cart`] and is the only writer of the
//! persisted copy. Every mutation follows the same sequence:
//!
//! 1. look up whatever the operation needs (catalog, stock)
//! 2. validate and compute the next cart
//! 3. persist the next cart
//! 4. replace the live cart and notify subscribers
//!
//! A failure at any step stops the sequence, leaves both copies untouched and
//! sends exactly one [`Notification`](crate::notify::Notification).
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartManager, CartServices};
//!
//! let manager = CartManager::load(services, "@RocketShoes:cart");
//! manager.on_cart_changed(|cart| tracing::info!(items = cart.len(), "cart changed"));
//!
//! manager.add_product(ProductId::new(42)).await.ok();
//! manager.update_product_amount(ProductId::new(42), 2).await.ok();
//! manager.remove_product(ProductId::new(42)).ok();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rocketshoes_core::{Cart, ProductId};
use tracing::{debug, error, info, instrument, warn};

use crate::api::{Catalog, StockLookup};
use crate::error::{CartError, CartOperation, Result};
use crate::notify::Notifier;
use crate::store::{KeyValueStore, load_cart, save_cart};

/// Callback invoked with the new cart after each successful mutation.
pub type CartListener = Arc<dyn Fn(&Cart) + Send + Sync>;

/// Handle returned by [`CartManager::on_cart_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// External collaborators the cart manager depends on.
#[derive(Clone)]
pub struct CartServices {
    pub catalog: Arc<dyn Catalog>,
    pub stock: Arc<dyn StockLookup>,
    pub store: Arc<dyn KeyValueStore>,
    pub notifier: Arc<dyn Notifier>,
}

// =============================================================================
// CartManager
// =============================================================================

/// Shopping cart with stock validation and persistence.
///
/// This struct is cheaply cloneable via `Arc`; clones share the same cart.
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<CartManagerInner>,
}

struct CartManagerInner {
    services: CartServices,
    storage_key: String,
    cart: RwLock<Cart>,
    listeners: Mutex<Vec<(SubscriptionId, CartListener)>>,
    next_subscription: AtomicU64,
}

impl CartManager {
    /// Create a manager, restoring the cart stored under `storage_key`.
    ///
    /// A missing entry starts an empty cart. An unreadable entry is logged
    /// and also starts an empty cart; it is overwritten by the next mutation.
    pub fn load(services: CartServices, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let cart = match load_cart(services.store.as_ref(), &storage_key) {
            Ok(Some(cart)) => {
                debug!(items = cart.len(), "Restored cart from storage");
                cart
            }
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, key = %storage_key, "Stored cart is unreadable, starting empty");
                Cart::new()
            }
        };

        Self {
            inner: Arc::new(CartManagerInner {
                services,
                storage_key,
                cart: RwLock::new(cart),
                listeners: Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.inner
            .cart
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Register `listener` to run after every successful mutation.
    ///
    /// Listeners run synchronously, in registration order, on the task that
    /// performed the mutation.
    pub fn on_cart_changed(
        &self,
        listener: impl Fn(&Cart) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is appended with quantity 1 without a
    /// stock check. An existing line is incremented only while its quantity
    /// is below available stock.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the cart was left unchanged. The error has
    /// already been reported through the notifier.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<()> {
        let next = self.next_after_add(product_id).await;
        self.finish(CartOperation::Add, next)
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` (already reported) if the product is
    /// not in the cart.
    #[instrument(skip(self))]
    pub fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let cart = self.cart();
        let next = if cart.contains(product_id) {
            Ok(cart.without(product_id))
        } else {
            Err(CartError::NotInCart(product_id))
        };
        self.finish(CartOperation::Remove, next)
    }

    /// Set a product's quantity.
    ///
    /// `amount` must be positive and below available stock. A product that is
    /// not in the cart leaves the lines as they are; the unchanged cart is
    /// still persisted and published.
    ///
    /// # Errors
    ///
    /// Returns `CartError` when the cart was left unchanged. The error has
    /// already been reported through the notifier.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, product_id: ProductId, amount: i64) -> Result<()> {
        let next = self.next_after_update(product_id, amount).await;
        self.finish(CartOperation::UpdateAmount, next)
    }

    async fn next_after_add(&self, product_id: ProductId) -> Result<Cart> {
        let product = self.inner.services.catalog.product(product_id).await?;
        let stock = self.inner.services.stock.stock(product_id).await?;

        let cart = self.cart();
        match cart.get(product.id) {
            None => Ok(cart.with_added(product)),
            Some(line) if stock.allows(line.amount) => Ok(cart.with_incremented(product.id)),
            Some(line) => Err(CartError::StockExceeded {
                product_id,
                requested: i64::from(line.amount) + 1,
                available: stock.amount,
            }),
        }
    }

    async fn next_after_update(&self, product_id: ProductId, amount: i64) -> Result<Cart> {
        let stock = self.inner.services.stock.stock(product_id).await?;

        if amount <= 0 {
            return Err(CartError::InvalidQuantity { product_id, amount });
        }

        let quantity = u32::try_from(amount)
            .ok()
            .filter(|quantity| stock.allows(*quantity))
            .ok_or(CartError::StockExceeded {
                product_id,
                requested: amount,
                available: stock.amount,
            })?;

        let cart = self.cart();
        if !cart.contains(product_id) {
            debug!("Product not in cart, quantity update leaves lines unchanged");
        }
        Ok(cart.with_amount(product_id, quantity))
    }

    /// Commit `next` or report why there is nothing to commit.
    fn finish(&self, operation: CartOperation, next: Result<Cart>) -> Result<()> {
        let outcome = next.and_then(|cart| self.commit(cart));

        match &outcome {
            Ok(()) => {
                info!(?operation, items = self.cart().len(), "Cart updated");
            }
            Err(e) if e.is_user_correctable() => {
                warn!(?operation, error = %e, "Cart operation rejected");
            }
            Err(e) => {
                error!(?operation, error = %e, "Cart operation failed");
            }
        }

        if let Err(e) = &outcome {
            self.inner.services.notifier.notify(e.notification(operation));
        }

        outcome
    }

    /// Persist, swap in and publish a new cart.
    fn commit(&self, cart: Cart) -> Result<()> {
        save_cart(
            self.inner.services.store.as_ref(),
            &self.inner.storage_key,
            &cart,
        )?;

        *self
            .inner
            .cart
            .write()
            .unwrap_or_else(PoisonError::into_inner) = cart.clone();

        self.publish(&cart);
        Ok(())
    }

    fn publish(&self, cart: &Cart) {
        // Clone out so listeners may subscribe or unsubscribe re-entrantly.
        let listeners: Vec<CartListener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(cart);
        }
    }
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("storage_key", &self.inner.storage_key)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}
