//! Rocketshoes CLI - Shopping cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! rs-cart show
//!
//! # Add one unit of product 42
//! rs-cart add 42
//!
//! # Set product 42 to 2 units
//! rs-cart update 42 2
//!
//! # Remove product 42
//! rs-cart remove 42
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product
//! - `update` - Set a product's quantity
//!
//! Configuration is read from the environment (see `rocketshoes_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocketshoes_cart::CartManager;
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "Rocketshoes cart CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set the quantity of a product
    Update {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout only carries the cart
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rocketshoes_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manager = commands::cart::open()?;
    execute(&manager, cli.command).await;
    commands::cart::print(&manager.cart());
    Ok(())
}

/// Apply a command to the cart.
///
/// Rejected operations are already reported through the notifier and leave
/// the cart unchanged, so they are not command failures.
async fn execute(manager: &CartManager, command: Commands) {
    let outcome = match command {
        Commands::Show => Ok(()),
        Commands::Add { id } => manager.add_product(id).await,
        Commands::Remove { id } => manager.remove_product(id),
        Commands::Update { id, amount } => manager.update_product_amount(id, amount).await,
    };

    if let Err(e) = outcome {
        tracing::debug!(error = %e, "Cart left unchanged");
    }
}
