//! Integration test support for the Rocketshoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_add` / `cart_remove` / `cart_update` - Per-operation behaviour
//! - `cart_persistence` - Store round-trips and restart behaviour
//! - `cart_scenarios` - Multi-step flows
//! - `cart_http` - Full stack against an in-process HTTP API and a file store
//!
//! Every test drives a real [`CartManager`]; only the catalog/stock lookups
//! are replaced by [`FakeStorefront`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rocketshoes_cart::api::{ApiError, Catalog, StockLookup};
use rocketshoes_cart::notify::RecordingNotifier;
use rocketshoes_cart::store::{KeyValueStore, MemoryStore, load_cart};
use rocketshoes_cart::{CartManager, CartServices, Notification};
use rocketshoes_core::{Cart, Price, Product, ProductId, Stock};

/// Storage key used by every harness.
pub const STORAGE_KEY: &str = "@RocketShoes:cart";

/// A catalog product with a predictable title and image.
#[must_use]
pub fn product(id: i32, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Sneaker {id}"),
        price: Price::from_cents(cents),
        image: format!("https://cdn.example.com/{id}.jpg"),
    }
}

// =============================================================================
// FakeStorefront
// =============================================================================

/// In-memory catalog and stock service with failure injection.
#[derive(Debug, Default)]
pub struct FakeStorefront {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, u32>>,
    offline: AtomicBool,
    catalog_calls: AtomicUsize,
    stock_calls: AtomicUsize,
}

impl FakeStorefront {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product priced at `cents` with `stock` units available.
    #[must_use]
    pub fn with_product(self, id: i32, cents: i64, stock: u32) -> Self {
        lock(&self.products).insert(ProductId::new(id), product(id, cents));
        lock(&self.stock).insert(ProductId::new(id), stock);
        self
    }

    /// Change available stock for a product.
    pub fn set_stock(&self, id: i32, amount: u32) {
        lock(&self.stock).insert(ProductId::new(id), amount);
    }

    /// Make the stock lookup for `id` fail while its catalog entry remains.
    pub fn drop_stock(&self, id: i32) {
        lock(&self.stock).remove(&ProductId::new(id));
    }

    /// Fail every lookup as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn catalog_calls(&self) -> usize {
        self.catalog_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.stock_calls.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Catalog for FakeStorefront {
    async fn product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        lock(&self.products)
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("products/{id}")))
    }
}

#[async_trait]
impl StockLookup for FakeStorefront {
    async fn stock(&self, id: ProductId) -> Result<Stock, ApiError> {
        self.stock_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        lock(&self.stock)
            .get(&id)
            .map(|amount| Stock { id, amount: *amount })
            .ok_or_else(|| ApiError::NotFound(format!("stock/{id}")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Harness
// =============================================================================

/// A cart manager wired to fakes, with handles on every collaborator.
pub struct Harness {
    pub manager: CartManager,
    pub api: Arc<FakeStorefront>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Harness over an empty store.
    #[must_use]
    pub fn new(api: FakeStorefront) -> Self {
        Self::with_store(Arc::new(api), Arc::new(MemoryStore::new()))
    }

    /// Harness over an existing store, as after a restart.
    #[must_use]
    pub fn with_store(api: Arc<FakeStorefront>, store: Arc<MemoryStore>) -> Self {
        let notifier = Arc::new(RecordingNotifier::new());
        let services = CartServices {
            catalog: api.clone(),
            stock: api.clone(),
            store: store.clone(),
            notifier: notifier.clone(),
        };
        Self {
            manager: CartManager::load(services, STORAGE_KEY),
            api,
            store,
            notifier,
        }
    }

    /// Start a fresh manager over the same store and services.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::with_store(Arc::clone(&self.api), Arc::clone(&self.store))
    }

    /// Current quantity of `id`, if it is in the cart.
    #[must_use]
    pub fn amount(&self, id: i32) -> Option<u32> {
        self.manager
            .cart()
            .get(ProductId::new(id))
            .map(|item| item.amount)
    }

    /// Product ids in cart order.
    #[must_use]
    pub fn ids(&self) -> Vec<i32> {
        self.manager
            .cart()
            .items()
            .iter()
            .map(|item| item.id().as_i32())
            .collect()
    }

    /// Cart as currently persisted.
    #[must_use]
    pub fn persisted(&self) -> Option<Cart> {
        load_cart(self.store.as_ref(), STORAGE_KEY).ok().flatten()
    }

    /// Raw persisted string.
    #[must_use]
    pub fn persisted_raw(&self) -> Option<String> {
        self.store.get(STORAGE_KEY).ok().flatten()
    }

    /// Notifications received so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifier.notifications()
    }
}
