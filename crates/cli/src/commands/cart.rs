//! Cart wiring and rendering for the CLI.
//!
//! # Environment Variables
//!
//! - `ROCKETSHOES_API_URL` - Storefront API base URL (required)
//! - `ROCKETSHOES_STORAGE_PATH` - Cart storage file
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart is stored under

use std::fmt::Write as _;
use std::io::IsTerminal;
use std::sync::Arc;

use rocketshoes_cart::api::{ApiClient, ApiError};
use rocketshoes_cart::config::{CartConfig, ConfigError};
use rocketshoes_cart::store::FileStore;
use rocketshoes_cart::notify::TracingNotifier;
use rocketshoes_cart::{CartManager, CartServices, Notification, Notifier};
use rocketshoes_core::Cart;
use thiserror::Error;

/// Errors that can occur while setting up the cart.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),
}

/// Shows notifications on the terminal.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    #[allow(clippy::print_stderr)]
    fn notify(&self, notification: Notification) {
        eprintln!("error: {notification}");
    }
}

/// Terminal output when a user is watching stderr, log events otherwise.
fn notifier() -> Arc<dyn Notifier> {
    if std::io::stderr().is_terminal() {
        Arc::new(TerminalNotifier)
    } else {
        Arc::new(TracingNotifier)
    }
}

/// Build a cart manager from environment configuration.
///
/// # Errors
///
/// Returns `SetupError` if configuration or the HTTP client is invalid.
pub fn open() -> Result<CartManager, SetupError> {
    let config = CartConfig::from_env()?;
    let api = Arc::new(ApiClient::new(&config.api)?);

    tracing::debug!(
        api = %config.api.base_url,
        storage = %config.storage.path.display(),
        "Opening cart"
    );

    let services = CartServices {
        catalog: api.clone(),
        stock: api,
        store: Arc::new(FileStore::new(&config.storage.path)),
        notifier: notifier(),
    };

    Ok(CartManager::load(services, config.storage.key))
}

/// Print the cart to stdout.
#[allow(clippy::print_stdout)]
pub fn print(cart: &Cart) {
    print!("{}", render(cart));
}

/// Render the cart as a plain-text table.
#[must_use]
pub fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{:>6}  {:<40}  {:>4} x {:>10}  {:>10}",
            item.id().as_i32(),
            item.product.title,
            item.amount,
            item.product.price.display(),
            item.line_total().display(),
        );
    }
    let _ = writeln!(
        out,
        "{} product(s), {} item(s), subtotal {}",
        cart.len(),
        cart.total_quantity(),
        cart.subtotal().display()
    );
    out
}
